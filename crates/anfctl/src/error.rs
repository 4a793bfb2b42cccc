//! Error types for the anfctl binary
//!
//! Wraps core errors with CLI-facing classification: which failures are
//! fatal (non-zero exit) versus a clean early stop (missing config,
//! missing credentials, unreadable certificate), plus cargo-style
//! diagnostics with actionable tips.

use colored::Colorize;
use thiserror::Error;

use anfctl_core::CoreError;

/// Cargo-style diagnostic formatter for CLI errors.
///
/// Produces structured output like:
/// ```text
/// error: no credentials available
///
///   tip: set service principal variables:
///       export AZURE_TENANT_ID=...
/// ```
pub struct CliDiagnostic {
    message: String,
    tips: Vec<(String, Vec<String>)>,
}

impl CliDiagnostic {
    /// Start a new error diagnostic with the given message.
    pub fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            tips: Vec::new(),
        }
    }

    /// Add a tip with optional example commands.
    pub fn tip(mut self, description: &str, commands: &[&str]) -> Self {
        self.tips.push((
            description.to_string(),
            commands.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    /// Print the diagnostic to stderr with colored formatting.
    pub fn print(&self) {
        eprint!("{}{}", "error".red().bold(), ": ".bold());
        eprintln!("{}", self.message);

        for (description, commands) in &self.tips {
            eprintln!();
            eprint!("  {}{}", "tip".yellow().bold(), ": ".bold());
            eprintln!("{}", description);
            for cmd in commands {
                eprintln!("      {}", cmd);
            }
        }
    }
}

/// Main error type for the anfctl application
#[derive(Error, Debug)]
pub enum AnfCtlError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing credentials: {message}")]
    MissingCredentials { message: String },

    #[error("Cannot read certificate file '{path}': {message}")]
    Certificate { path: String, message: String },

    #[error("API error: {message}")]
    Api { message: String },

    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("Timeout: {message}")]
    Timeout { message: String },

    #[error("Provisioning failed: {message}")]
    Provisioning { message: String },

    #[error("Output formatting error: {message}")]
    Output { message: String },

    #[error("Aborted by user")]
    Aborted,
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, AnfCtlError>;

impl AnfCtlError {
    /// Missing configuration, credentials, or certificate stops the run but
    /// exits cleanly; actual API failures abort with a non-zero code.
    pub fn exit_code(&self) -> i32 {
        match self {
            AnfCtlError::Config(_)
            | AnfCtlError::MissingCredentials { .. }
            | AnfCtlError::Certificate { .. }
            | AnfCtlError::Aborted => 0,
            _ => 1,
        }
    }

    /// Get helpful suggestions for resolving this error
    pub fn suggestions(&self) -> Vec<(String, Vec<String>)> {
        match self {
            AnfCtlError::Config(_) => vec![(
                "create a config file with your deployment settings".to_string(),
                vec![
                    "anfctl status --config-file ./anfctl.toml".to_string(),
                    "see README.md for the config format".to_string(),
                ],
            )],
            AnfCtlError::MissingCredentials { .. } => vec![
                (
                    "set service principal variables:".to_string(),
                    vec![
                        "export AZURE_TENANT_ID=<tenant>".to_string(),
                        "export AZURE_CLIENT_ID=<app>".to_string(),
                        "export AZURE_CLIENT_SECRET=<secret>".to_string(),
                    ],
                ),
                (
                    "or sign in with the Azure CLI:".to_string(),
                    vec!["az login".to_string()],
                ),
            ],
            AnfCtlError::Certificate { path, .. } => vec![(
                "check the root CA certificate path in your config".to_string(),
                vec![format!("ls -l {}", path)],
            )],
            AnfCtlError::Connection { .. } => vec![(
                "check network connectivity to the ARM endpoint".to_string(),
                vec![],
            )],
            AnfCtlError::Timeout { .. } => vec![(
                "raise the polling window and retry".to_string(),
                vec!["anfctl provision --wait-timeout 3600".to_string()],
            )],
            _ => vec![],
        }
    }

    /// Print a cargo-style diagnostic to stderr using colored formatting.
    pub fn print_diagnostic(&self) {
        let mut diag = CliDiagnostic::error(&self.to_string());
        for (description, commands) in self.suggestions() {
            let refs: Vec<&str> = commands.iter().map(|s| s.as_str()).collect();
            diag = diag.tip(&description, &refs);
        }
        diag.print();
    }
}

impl From<CoreError> for AnfCtlError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { message } => {
                AnfCtlError::MissingCredentials { message }
            }
            CoreError::Connection(e) => AnfCtlError::Connection {
                message: e.to_string(),
            },
            CoreError::PollTimeout(duration) => AnfCtlError::Timeout {
                message: format!("operation did not complete within {:?}", duration),
            },
            CoreError::ProvisioningFailed(message) => AnfCtlError::Provisioning { message },
            CoreError::Config(message) => AnfCtlError::Config(message),
            other => AnfCtlError::Api {
                message: other.to_string(),
            },
        }
    }
}

impl From<anfctl_core::ConfigError> for AnfCtlError {
    fn from(err: anfctl_core::ConfigError) -> Self {
        AnfCtlError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AnfCtlError {
    fn from(err: serde_json::Error) -> Self {
        AnfCtlError::Output {
            message: format!("JSON error: {}", err),
        }
    }
}

impl From<serde_yaml::Error> for AnfCtlError {
    fn from(err: serde_yaml::Error) -> Self {
        AnfCtlError::Output {
            message: format!("YAML error: {}", err),
        }
    }
}

impl From<std::io::Error> for AnfCtlError {
    fn from(err: std::io::Error) -> Self {
        AnfCtlError::Output {
            message: format!("IO error: {}", err),
        }
    }
}
