//! Provider factory functions.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::client::HttpAttributeClient;
use crate::config::ClientConfig;
use crate::error::{ProviderError, Result};
use crate::traits::AttributeProvider;

/// Builds the pooled HTTP client shared by every attribute.
///
/// # Examples
///
/// ```rust,no_run
/// use twin_scanner_provider::{AttributeProvider, ClientConfig, create_http_client, create_provider};
///
/// let config = ClientConfig::default();
/// let http = create_http_client(&config).unwrap();
/// let a_record = create_provider(&http, &config, "A");
/// assert_eq!(a_record.provider_key(), "A");
/// ```
pub fn create_http_client(config: &ClientConfig) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .map_err(|e| ProviderError::NetworkError {
            provider: "http".to_string(),
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

/// Creates the [`AttributeProvider`] for one provider key on top of a shared client.
pub fn create_provider(
    client: &Client,
    config: &ClientConfig,
    provider_key: &str,
) -> Arc<dyn AttributeProvider> {
    Arc::new(HttpAttributeClient::new(
        client.clone(),
        config.clone(),
        provider_key,
    ))
}
