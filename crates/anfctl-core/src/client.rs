//! Thin ARM REST client
//!
//! Wraps reqwest with bearer-token auth, the NetApp `api-version` query
//! parameter, and ARM error-envelope decoding. The base URL is overridable
//! so tests can point the client at a mock server.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::auth::TokenCredential;
use crate::error::{CoreError, Result};

/// Default ARM management endpoint
pub const DEFAULT_ARM_ENDPOINT: &str = "https://management.azure.com";

/// Microsoft.NetApp API version used for all requests
pub const NETAPP_API_VERSION: &str = "2024-03-01";

/// User agent string for anfctl HTTP requests
const ANFCTL_USER_AGENT: &str = concat!("anfctl/", env!("CARGO_PKG_VERSION"));

/// Authenticated client scoped to a single subscription
#[derive(Clone)]
pub struct ArmClient {
    http: reqwest::Client,
    base_url: Url,
    subscription_id: String,
    credential: Arc<dyn TokenCredential>,
}

impl ArmClient {
    pub fn builder() -> ArmClientBuilder {
        ArmClientBuilder::default()
    }

    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// GET a resource, decoding the body as `T`. 404 maps to `NotFound`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.resource_url(path)?;
        trace!("GET {}", url);
        let response = self.authorized(self.http.get(url)).await?.send().await?;
        let body = self.check(path, response).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// PUT a resource body, decoding the provider's representation
    pub async fn put_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.resource_url(path)?;
        debug!("PUT {}", url);
        let response = self
            .authorized(self.http.put(url))
            .await?
            .json(body)
            .send()
            .await?;
        let body = self.check(path, response).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// DELETE a resource. 200/202/204 all count as accepted.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let url = self.resource_url(path)?;
        debug!("DELETE {}", url);
        let response = self.authorized(self.http.delete(url)).await?.send().await?;
        self.check(path, response).await?;
        Ok(())
    }

    async fn authorized(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder> {
        let token = self.credential.token().await?;
        Ok(request.bearer_auth(token.token))
    }

    fn resource_url(&self, path: &str) -> Result<Url> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| CoreError::Config(format!("invalid resource path '{}': {}", path, e)))?;
        url.query_pairs_mut()
            .append_pair("api-version", NETAPP_API_VERSION);
        Ok(url)
    }

    /// Map the response to a JSON body or a classified error
    async fn check(&self, path: &str, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if status.is_success() {
            if text.is_empty() {
                return Ok(Value::Null);
            }
            return Ok(serde_json::from_str(&text)?);
        }

        Err(match status.as_u16() {
            404 => CoreError::NotFound {
                resource: path.to_string(),
            },
            401 | 403 => CoreError::AuthenticationFailed {
                message: arm_error_message(&text)
                    .unwrap_or_else(|| format!("HTTP {} from ARM", status.as_u16())),
            },
            code => {
                let (error_code, message) = arm_error_parts(&text);
                CoreError::Api {
                    status: code,
                    code: error_code,
                    message,
                }
            }
        })
    }
}

/// Builder for [`ArmClient`]
#[derive(Default)]
pub struct ArmClientBuilder {
    base_url: Option<String>,
    subscription_id: Option<String>,
    credential: Option<Arc<dyn TokenCredential>>,
}

impl ArmClientBuilder {
    /// Override the management endpoint (tests, sovereign clouds)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn subscription_id(mut self, id: impl Into<String>) -> Self {
        self.subscription_id = Some(id.into());
        self
    }

    pub fn credential(mut self, credential: Arc<dyn TokenCredential>) -> Self {
        self.credential = Some(credential);
        self
    }

    pub fn build(self) -> Result<ArmClient> {
        let raw_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_ARM_ENDPOINT.to_string());
        // Trailing slash so Url::join keeps the full base path
        let base_url = Url::parse(&format!("{}/", raw_url.trim_end_matches('/')))
            .map_err(|e| CoreError::Config(format!("invalid ARM endpoint '{}': {}", raw_url, e)))?;
        let subscription_id = self
            .subscription_id
            .ok_or_else(|| CoreError::Config("subscription_id is required".to_string()))?;
        let credential = self
            .credential
            .ok_or_else(|| CoreError::Config("credential is required".to_string()))?;

        let http = reqwest::Client::builder()
            .user_agent(ANFCTL_USER_AGENT)
            .build()?;

        Ok(ArmClient {
            http,
            base_url,
            subscription_id,
            credential,
        })
    }
}

/// Extract the human-readable message from an ARM error envelope
fn arm_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(|s| s.to_string())
}

/// Extract `(code, message)` from an ARM error envelope, falling back to
/// the raw body when it is not the expected shape
fn arm_error_parts(body: &str) -> (String, String) {
    if let Ok(value) = serde_json::from_str::<Value>(body)
        && let Some(error) = value.get("error")
    {
        let code = error
            .get("code")
            .and_then(|c| c.as_str())
            .unwrap_or("Unknown")
            .to_string();
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or(body)
            .to_string();
        return (code, message);
    }
    ("Unknown".to_string(), body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_error_parts_from_envelope() {
        let body = r#"{"error": {"code": "InvalidSubnet", "message": "Subnet must be delegated to Microsoft.NetApp/volumes"}}"#;
        let (code, message) = arm_error_parts(body);
        assert_eq!(code, "InvalidSubnet");
        assert_eq!(message, "Subnet must be delegated to Microsoft.NetApp/volumes");
    }

    #[test]
    fn test_arm_error_parts_from_garbage_body() {
        let (code, message) = arm_error_parts("<html>Bad Gateway</html>");
        assert_eq!(code, "Unknown");
        assert_eq!(message, "<html>Bad Gateway</html>");
    }

    #[test]
    fn test_arm_error_message_missing_fields() {
        assert!(arm_error_message(r#"{"error": {}}"#).is_none());
        assert!(arm_error_message("not json").is_none());
    }

    #[test]
    fn test_builder_requires_subscription() {
        use crate::auth::StaticTokenCredential;
        let result = ArmClient::builder()
            .credential(Arc::new(StaticTokenCredential::new("t")))
            .build();
        assert!(result.is_err());
    }
}
