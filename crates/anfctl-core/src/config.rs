//! Configuration for anfctl
//!
//! Deployment parameters live in a TOML file (default location via
//! `directories`, or an explicit path). Every scalar field can be
//! overridden with an `ANFCTL_`-prefixed environment variable for CI use.
//! The Active Directory join password is deliberately not part of the
//! config file; it comes from `ANFCTL_AD_PASSWORD` or an interactive
//! prompt in the CLI.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    MIN_POOL_SIZE_BYTES, MIN_VOLUME_SIZE_BYTES, ServiceLevel, subnet_resource_id,
};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found at {path}. Create it with your subscription, resource group, and network settings.")]
    NotFound { path: PathBuf },

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid config: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Could not determine config directory")]
    NoConfigDir,
}

type Result<T> = std::result::Result<T, ConfigError>;

impl From<ConfigError> for crate::error::CoreError {
    fn from(err: ConfigError) -> Self {
        crate::error::CoreError::Config(err.to_string())
    }
}

/// Active Directory join settings for the SMB side of the dual-protocol volume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveDirectoryConfig {
    /// Identity with rights to domain-join computers
    pub username: String,
    /// Comma-separated DNS server addresses, e.g. "10.0.2.4,10.0.2.5"
    pub dns: String,
    /// AD domain FQDN, e.g. "testdomain.local"
    pub domain: String,
    /// SMB server name prefix; at most 10 characters, a random suffix is
    /// appended during the domain join
    pub smb_server_name: String,
    /// Path to the root CA certificate file to base64-encode into the account
    pub root_ca_cert_path: PathBuf,
}

/// Deployment parameters for the provisioning run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionConfig {
    pub subscription_id: String,
    pub location: String,
    pub resource_group: String,
    pub vnet_name: String,
    pub subnet_name: String,

    #[serde(default = "default_account_name")]
    pub account_name: String,
    #[serde(default = "default_pool_name")]
    pub pool_name: String,
    #[serde(default = "default_volume_name")]
    pub volume_name: String,

    #[serde(default)]
    pub service_level: ServiceLevel,
    /// Pool size in bytes; defaults to the 4 TiB minimum
    #[serde(default = "default_pool_size")]
    pub pool_size: i64,
    /// Volume quota in bytes; defaults to the 100 GiB minimum
    #[serde(default = "default_volume_size")]
    pub volume_size: i64,

    pub active_directory: ActiveDirectoryConfig,
}

fn default_account_name() -> String {
    "anf-example-account".to_string()
}

fn default_pool_name() -> String {
    "anf-example-pool".to_string()
}

fn default_volume_name() -> String {
    "anf-example-volume".to_string()
}

fn default_pool_size() -> i64 {
    MIN_POOL_SIZE_BYTES
}

fn default_volume_size() -> i64 {
    MIN_VOLUME_SIZE_BYTES
}

impl ProvisionConfig {
    /// Load from the default location, applying environment overrides
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_path()?)
    }

    /// Load from an explicit path, applying environment overrides
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: ProvisionConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        config.apply_overrides(&env_overrides());
        config.validate()?;
        Ok(config)
    }

    /// Default config file location: `<config dir>/anfctl/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "anfctl").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply `ANFCTL_*` overrides from the given map (the map indirection
    /// keeps this testable without mutating process environment)
    pub fn apply_overrides(&mut self, vars: &HashMap<String, String>) {
        let mut set = |key: &str, target: &mut String| {
            if let Some(value) = vars.get(key) {
                *target = value.clone();
            }
        };
        set("ANFCTL_SUBSCRIPTION_ID", &mut self.subscription_id);
        set("ANFCTL_LOCATION", &mut self.location);
        set("ANFCTL_RESOURCE_GROUP", &mut self.resource_group);
        set("ANFCTL_VNET_NAME", &mut self.vnet_name);
        set("ANFCTL_SUBNET_NAME", &mut self.subnet_name);
        set("ANFCTL_ACCOUNT_NAME", &mut self.account_name);
        set("ANFCTL_POOL_NAME", &mut self.pool_name);
        set("ANFCTL_VOLUME_NAME", &mut self.volume_name);
    }

    /// Field-level validation of the loaded config
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("subscription_id", &self.subscription_id),
            ("location", &self.location),
            ("resource_group", &self.resource_group),
            ("vnet_name", &self.vnet_name),
            ("subnet_name", &self.subnet_name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: field.to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }

        if self.pool_size < MIN_POOL_SIZE_BYTES {
            return Err(ConfigError::Validation {
                field: "pool_size".to_string(),
                message: format!("must be at least {} bytes (4 TiB)", MIN_POOL_SIZE_BYTES),
            });
        }
        if self.volume_size < MIN_VOLUME_SIZE_BYTES {
            return Err(ConfigError::Validation {
                field: "volume_size".to_string(),
                message: format!("must be at least {} bytes (100 GiB)", MIN_VOLUME_SIZE_BYTES),
            });
        }

        let ad = &self.active_directory;
        if ad.smb_server_name.is_empty() || ad.smb_server_name.len() > 10 {
            return Err(ConfigError::Validation {
                field: "active_directory.smb_server_name".to_string(),
                message: "must be 1-10 characters".to_string(),
            });
        }
        if ad.dns.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "active_directory.dns".to_string(),
                message: "must list at least one DNS server".to_string(),
            });
        }

        Ok(())
    }

    /// ARM resource ID of the delegated subnet the volume mounts into
    pub fn subnet_id(&self) -> String {
        subnet_resource_id(
            &self.subscription_id,
            &self.resource_group,
            &self.vnet_name,
            &self.subnet_name,
        )
    }
}

/// Snapshot the `ANFCTL_*` variables from the process environment
pub fn env_overrides() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with("ANFCTL_"))
        .collect()
}
