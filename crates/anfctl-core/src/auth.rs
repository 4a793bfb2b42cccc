//! Credential acquisition for the ARM endpoint
//!
//! Resolution order mirrors the default Azure credential chain the original
//! tooling uses:
//! 1. Service principal from `AZURE_TENANT_ID` / `AZURE_CLIENT_ID` /
//!    `AZURE_CLIENT_SECRET` (OAuth2 client-credentials grant)
//! 2. Azure CLI (`az account get-access-token`)
//!
//! Tokens are cached in-process and refreshed when close to expiry.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use crate::error::{CoreError, Result};

/// Default authority host for token requests
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// OAuth2 scope covering the ARM management endpoint
const MANAGEMENT_SCOPE: &str = "https://management.azure.com/.default";

/// Refresh tokens this close to expiry
const EXPIRY_MARGIN_SECS: i64 = 300;

/// A bearer token with its expiry time
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_on: DateTime<Utc>,
}

impl AccessToken {
    /// True if the token is still usable with margin to spare
    pub fn is_fresh(&self) -> bool {
        self.expires_on - ChronoDuration::seconds(EXPIRY_MARGIN_SECS) > Utc::now()
    }
}

/// Source of bearer tokens for ARM requests
#[async_trait]
pub trait TokenCredential: Send + Sync {
    async fn token(&self) -> Result<AccessToken>;
}

/// Fixed token, for tests and for pre-acquired tokens passed via environment
pub struct StaticTokenCredential {
    token: String,
}

impl StaticTokenCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenCredential for StaticTokenCredential {
    async fn token(&self) -> Result<AccessToken> {
        Ok(AccessToken {
            token: self.token.clone(),
            expires_on: Utc::now() + ChronoDuration::hours(1),
        })
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Service principal doing the OAuth2 client-credentials grant
pub struct ServicePrincipalCredential {
    tenant_id: String,
    client_id: String,
    client_secret: String,
    authority_host: Url,
    http: reqwest::Client,
    cache: Mutex<Option<AccessToken>>,
}

impl ServicePrincipalCredential {
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        authority_host: Url,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authority_host,
            http: reqwest::Client::new(),
            cache: Mutex::new(None),
        }
    }

    /// Build from the conventional AZURE_* environment variables.
    /// Returns None unless all three are present.
    pub fn from_env() -> Option<Self> {
        let tenant_id = std::env::var("AZURE_TENANT_ID").ok()?;
        let client_id = std::env::var("AZURE_CLIENT_ID").ok()?;
        let client_secret = std::env::var("AZURE_CLIENT_SECRET").ok()?;
        let authority = std::env::var("AZURE_AUTHORITY_HOST")
            .ok()
            .and_then(|v| Url::parse(&v).ok())
            .unwrap_or_else(|| {
                Url::parse(DEFAULT_AUTHORITY_HOST).expect("default authority host parses")
            });
        debug!("Using service principal credentials from environment");
        Some(Self::new(tenant_id, client_id, client_secret, authority))
    }

    async fn request_token(&self) -> Result<AccessToken> {
        let token_url = self
            .authority_host
            .join(&format!("{}/oauth2/v2.0/token", self.tenant_id))
            .map_err(|e| CoreError::AuthenticationFailed {
                message: format!("invalid authority host: {}", e),
            })?;

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", MANAGEMENT_SCOPE),
        ];

        let response = self.http.post(token_url).form(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CoreError::AuthenticationFailed {
                message: format!("token endpoint returned {}: {}", status.as_u16(), body),
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(AccessToken {
            token: token.access_token,
            expires_on: Utc::now() + ChronoDuration::seconds(token.expires_in),
        })
    }
}

#[async_trait]
impl TokenCredential for ServicePrincipalCredential {
    async fn token(&self) -> Result<AccessToken> {
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref()
            && cached.is_fresh()
        {
            return Ok(cached.clone());
        }

        let token = self.request_token().await?;
        *cache = Some(token.clone());
        Ok(token)
    }
}

#[derive(Deserialize)]
struct CliTokenOutput {
    #[serde(rename = "accessToken")]
    access_token: String,
    // az emits both a local-time "expiresOn" string and an epoch
    // "expires_on"; only the epoch form is worth parsing
    #[serde(default, rename = "expires_on")]
    expires_on: Option<i64>,
}

/// Azure CLI fallback: shells out to `az account get-access-token`
pub struct AzureCliCredential {
    cache: Mutex<Option<AccessToken>>,
}

impl AzureCliCredential {
    pub fn new() -> Self {
        Self {
            cache: Mutex::new(None),
        }
    }

    /// True if the `az` binary is on PATH
    pub fn is_available() -> bool {
        which_az().is_some()
    }

    async fn request_token(&self) -> Result<AccessToken> {
        let output = tokio::process::Command::new("az")
            .args([
                "account",
                "get-access-token",
                "--resource",
                "https://management.azure.com",
                "--output",
                "json",
            ])
            .output()
            .await
            .map_err(|e| CoreError::AuthenticationFailed {
                message: format!("failed to run az: {}", e),
            })?;

        if !output.status.success() {
            return Err(CoreError::AuthenticationFailed {
                message: format!(
                    "az account get-access-token failed: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let parsed: CliTokenOutput = serde_json::from_slice(&output.stdout)?;
        let expires_on = parsed
            .expires_on
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or_else(|| Utc::now() + ChronoDuration::hours(1));
        Ok(AccessToken {
            token: parsed.access_token,
            expires_on,
        })
    }
}

impl Default for AzureCliCredential {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenCredential for AzureCliCredential {
    async fn token(&self) -> Result<AccessToken> {
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref()
            && cached.is_fresh()
        {
            return Ok(cached.clone());
        }

        let token = self.request_token().await?;
        *cache = Some(token.clone());
        Ok(token)
    }
}

fn which_az() -> Option<std::path::PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join("az"))
        .find(|candidate| candidate.is_file())
}

/// Default chain: service principal from environment, then Azure CLI.
///
/// `resolve` fails up front when no source is usable so the caller can stop
/// cleanly before making any management calls.
pub struct DefaultCredentialChain;

impl DefaultCredentialChain {
    pub fn resolve() -> Result<Arc<dyn TokenCredential>> {
        if let Some(sp) = ServicePrincipalCredential::from_env() {
            return Ok(Arc::new(sp));
        }
        if AzureCliCredential::is_available() {
            debug!("Falling back to Azure CLI credentials");
            return Ok(Arc::new(AzureCliCredential::new()));
        }
        Err(CoreError::AuthenticationFailed {
            message: "no credentials available: set AZURE_TENANT_ID/AZURE_CLIENT_ID/AZURE_CLIENT_SECRET or install the Azure CLI".to_string(),
        })
    }
}
