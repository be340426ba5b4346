//! Raw HTTP calls; failures are still typed here.

use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::types::{AttributeMetadata, ScanResponse, Value};

use super::HttpAttributeClient;

impl HttpAttributeClient {
    /// 执行 GET 请求并解析 JSON 响应
    ///
    /// `max_retries` is 0 for calls with side effects.
    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &[(&str, &str)],
        max_retries: u32,
    ) -> Result<T> {
        let url = self.config.endpoint(operation);
        let request = self.client.get(&url).query(query);

        let (status, body) = HttpUtils::execute_request_with_retry(
            request,
            &self.provider_key,
            operation,
            max_retries,
        )
        .await?;

        HttpUtils::ensure_success(status, &body, &self.provider_key)?;
        HttpUtils::parse_json(&body, &self.provider_key)
    }

    /// `GET /scan?attribute=<key>&domain=<domain>`
    ///
    /// Sent once: the service keeps scanning after a client timeout, so a
    /// retry would start a second scan of the same attribute.
    pub(crate) async fn request_scan(&self, domain: &str) -> Result<ScanResponse> {
        self.get_json(
            "scan",
            &[("attribute", self.provider_key.as_str()), ("domain", domain)],
            0,
        )
        .await
    }

    /// `GET /get?attribute=<key>&domain=<domain>`
    pub(crate) async fn request_records(&self, domain: &str) -> Result<Value> {
        self.get_json(
            "get",
            &[("attribute", self.provider_key.as_str()), ("domain", domain)],
            self.config.max_retries,
        )
        .await
    }

    /// `GET /describe?attribute=<key>`
    pub(crate) async fn request_metadata(&self) -> Result<AttributeMetadata> {
        self.get_json(
            "describe",
            &[("attribute", self.provider_key.as_str())],
            self.config.max_retries,
        )
        .await
    }
}
