use colored::Colorize;
use serde::Serialize;

use crate::error::Result;

#[derive(Debug, Clone, Copy, clap::ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable messages
    #[default]
    Auto,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

impl OutputFormat {
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Json | Self::Yaml)
    }
}

/// Serialize `data` to stdout in the requested format
pub fn print_output<T: Serialize>(data: T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&data)?),
        OutputFormat::Auto | OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&data)?)
        }
    }
    Ok(())
}

/// Plain progress message
pub fn message(text: &str) {
    println!("{}", text);
}

/// Success line with a green check, used after each resource lands
pub fn success(text: &str) {
    println!("{} {}", "\u{2713}".green().bold(), text);
}
