//! # anfctl-core
//!
//! Library layer for the anfctl CLI: an ARM REST client scoped to the
//! Azure NetApp Files resource provider, typed resource models, a default
//! credential chain, configuration loading, and the provisioning workflows
//! the CLI drives.
//!
//! The workflow layer is where the interesting semantics live:
//!
//! - `ensure_*_and_wait` is **create-or-reuse**: an existing resource is
//!   returned without issuing a create call; an absent one gets exactly one
//!   PUT followed by provisioning-state polling.
//! - `delete_*_and_wait` is DELETE plus the deletion-confirmation loop,
//!   polling GET until the provider reports not-found.

pub mod accounts;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod pools;
pub mod progress;
pub mod volumes;
pub mod workflows;

pub use accounts::AccountHandler;
pub use auth::{
    AzureCliCredential, DefaultCredentialChain, ServicePrincipalCredential,
    StaticTokenCredential, TokenCredential,
};
pub use client::{ArmClient, ArmClientBuilder, NETAPP_API_VERSION};
pub use config::{ConfigError, ProvisionConfig};
pub use error::{CoreError, Result};
pub use models::{
    ActiveDirectory, CapacityPool, MountTarget, NetAppAccount, SecurityStyle, ServiceLevel, Volume,
};
pub use pools::PoolHandler;
pub use progress::{ProgressCallback, ProgressEvent};
pub use volumes::VolumeHandler;
