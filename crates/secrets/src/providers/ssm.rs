//! AWS Systems Manager Parameter Store provider.
//!
//! Resolves `ssm://` references via `GetParameter`. Query parameters:
//! `decrypt` asks the backend to reverse SecureString encryption, `version`
//! selects a historical revision, `region` selects the endpoint/credential
//! scope. Clients are cached per region: the AWS handshake is paid once per
//! region, not once per resolve.

use crate::core::{Result, SecretError, SecretUri};
use crate::providers::{SecretProvider, normalize_path};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_ssm::Client as SsmClient;
use aws_sdk_ssm::error::ProvideErrorMetadata;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Key under which the region-less client is cached.
const DEFAULT_REGION_KEY: &str = "default";

/// Parameter Store provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SsmProviderConfig {
    /// Region used when a reference carries no `region` parameter
    /// (auto-detected from the environment if `None`)
    pub region: Option<String>,

    /// Custom endpoint URL (for LocalStack or other AWS-compatible services)
    pub endpoint_url: Option<String>,
}

/// AWS Parameter Store secret provider
pub struct SsmProvider {
    shared_config: aws_config::SdkConfig,
    clients: DashMap<String, SsmClient>,
}

impl std::fmt::Debug for SsmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsmProvider")
            .field("regions", &self.clients.len())
            .finish()
    }
}

impl SsmProvider {
    /// Create a provider, loading AWS configuration from the default chain
    /// (environment variables, shared config file, instance role).
    pub async fn new(config: SsmProviderConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }

        if let Some(endpoint) = config.endpoint_url.as_deref() {
            loader = loader.endpoint_url(endpoint);
        }

        let shared_config = loader.load().await;

        tracing::info!(
            provider = "ssm",
            region = ?config.region,
            "Initialized Parameter Store provider"
        );

        Self {
            shared_config,
            clients: DashMap::new(),
        }
    }

    /// Client for a region, built lazily on first use and reused thereafter.
    fn client_for(&self, region: Option<&str>) -> SsmClient {
        let key = region.unwrap_or(DEFAULT_REGION_KEY).to_string();

        if let Some(client) = self.clients.get(&key) {
            return client.clone();
        }

        let mut builder = aws_sdk_ssm::config::Builder::from(&self.shared_config);
        if let Some(region) = region {
            builder = builder.region(Region::new(region.to_string()));
        }
        let client = SsmClient::from_conf(builder.build());

        tracing::debug!(region = %key, "Built Parameter Store client");
        self.clients.entry(key).or_insert(client).clone()
    }

    /// Number of distinct region clients built so far.
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }
}

#[async_trait]
impl SecretProvider for SsmProvider {
    fn scheme(&self) -> &'static str {
        "ssm"
    }

    #[tracing::instrument(skip(self, uri), fields(provider = "ssm", path = %uri.path()))]
    async fn resolve(&self, uri: &SecretUri) -> Result<String> {
        let path = normalize_path(uri.path());
        let decrypt = uri.bool_param("decrypt")?;

        // Parameter Store selects historical revisions via "name:version".
        let selector = match uri.int_param("version")? {
            Some(version) => format!("{path}:{version}"),
            None => path.clone(),
        };

        let client = self.client_for(uri.param("region"));

        let result = client
            .get_parameter()
            .name(&selector)
            .with_decryption(decrypt)
            .send()
            .await;

        match result {
            Ok(output) => output
                .parameter()
                .and_then(|p| p.value())
                .map(ToString::to_string)
                .ok_or_else(|| SecretError::Backend {
                    scheme: "ssm".to_string(),
                    message: format!("parameter '{selector}' returned no value"),
                }),
            Err(sdk_err) => {
                let err = sdk_err.into_service_error();

                if err.is_parameter_not_found() || err.is_parameter_version_not_found() {
                    return Err(SecretError::NotFound { path: selector });
                }

                if err.is_invalid_key_id() {
                    return Err(SecretError::InvalidKey { path: selector });
                }

                if err.code() == Some("AccessDeniedException") {
                    return Err(SecretError::AccessDenied { path: selector });
                }

                Err(SecretError::Backend {
                    scheme: "ssm".to_string(),
                    message: err
                        .message()
                        .map_or_else(|| err.to_string(), ToString::to_string),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SsmProviderConfig {
        // Pinned region keeps tests offline (no instance-metadata lookup).
        SsmProviderConfig {
            region: Some("us-east-1".to_string()),
            endpoint_url: Some("http://localhost:4566".to_string()),
        }
    }

    #[tokio::test]
    async fn one_client_per_region() {
        let provider = SsmProvider::new(test_config()).await;
        assert_eq!(provider.scheme(), "ssm");
        assert_eq!(provider.client_count(), 0);

        let _ = provider.client_for(Some("us-east-1"));
        let _ = provider.client_for(Some("eu-west-1"));
        assert_eq!(provider.client_count(), 2);

        // Same region reuses the cached handle.
        let _ = provider.client_for(Some("us-east-1"));
        assert_eq!(provider.client_count(), 2);
    }

    #[tokio::test]
    async fn regionless_references_share_the_default_client() {
        let provider = SsmProvider::new(test_config()).await;

        let _ = provider.client_for(None);
        let _ = provider.client_for(None);
        assert_eq!(provider.client_count(), 1);
    }
}
