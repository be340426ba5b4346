//! HTTP-backed attribute provider

mod http;
mod provider;

use reqwest::Client;

use crate::config::ClientConfig;

/// Glyph that opens every synthesized failure status.
pub const ERROR_GLYPH: &str = "❌";
/// Glyph that opens synthesized success statuses.
pub const SUCCESS_GLYPH: &str = "✅";

/// [`AttributeProvider`](crate::AttributeProvider) talking to the attribute
/// service over HTTP/JSON.
///
/// Cheap to construct: the underlying [`Client`] is a shared connection pool,
/// so every registry entry can hold its own instance.
#[derive(Clone)]
pub struct HttpAttributeClient {
    pub(crate) client: Client,
    pub(crate) config: ClientConfig,
    pub(crate) provider_key: String,
}

impl HttpAttributeClient {
    pub fn new(client: Client, config: ClientConfig, provider_key: impl Into<String>) -> Self {
        Self {
            client,
            config,
            provider_key: provider_key.into(),
        }
    }
}

impl std::fmt::Debug for HttpAttributeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAttributeClient")
            .field("provider_key", &self.provider_key)
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}
