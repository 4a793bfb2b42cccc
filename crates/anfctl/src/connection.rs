//! ARM client construction from config and environment
//!
//! Credential resolution honors two override variables before the default
//! chain: `ANFCTL_ARM_URL` (alternate management endpoint, used by tests)
//! and `ANFCTL_ARM_TOKEN` (pre-acquired bearer token). The default chain is
//! service principal from the environment, then the Azure CLI.

use std::sync::Arc;

use tracing::{debug, info};

use anfctl_core::auth::{DefaultCredentialChain, StaticTokenCredential, TokenCredential};
use anfctl_core::{ArmClient, ProvisionConfig};

use crate::error::{AnfCtlError, Result};

/// Build an authenticated ARM client scoped to the configured subscription
pub fn build_client(config: &ProvisionConfig) -> Result<ArmClient> {
    debug!("Creating ARM management client");

    let credential: Arc<dyn TokenCredential> =
        if let Ok(token) = std::env::var("ANFCTL_ARM_TOKEN") {
            info!("Using pre-acquired token from ANFCTL_ARM_TOKEN");
            Arc::new(StaticTokenCredential::new(token))
        } else {
            DefaultCredentialChain::resolve().map_err(|e| AnfCtlError::MissingCredentials {
                message: e.to_string(),
            })?
        };

    let mut builder = ArmClient::builder()
        .subscription_id(&config.subscription_id)
        .credential(credential);

    if let Ok(endpoint) = std::env::var("ANFCTL_ARM_URL") {
        info!("Using alternate ARM endpoint: {}", endpoint);
        builder = builder.base_url(endpoint);
    }

    Ok(builder.build()?)
}
