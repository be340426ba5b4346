//! `AttributeProvider` implementation: typed failures become data.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::normalize::normalize_records;
use crate::traits::AttributeProvider;
use crate::types::{AttributeMetadata, Record, error_record};

use super::{ERROR_GLYPH, HttpAttributeClient, SUCCESS_GLYPH};

impl HttpAttributeClient {
    /// Status line for a failed scan: `❌ Fehler bei Scan (<key>): <reason>`.
    pub(crate) fn scan_failure(&self, reason: &str) -> String {
        format!("{ERROR_GLYPH} Fehler bei Scan ({}): {reason}", self.provider_key)
    }

    fn log_failure(&self, operation: &str, err: &ProviderError) {
        if err.is_expected() {
            log::warn!("[{}] {operation} failed: {err}", self.provider_key);
        } else {
            log::error!("[{}] {operation} failed: {err}", self.provider_key);
        }
    }
}

#[async_trait]
impl AttributeProvider for HttpAttributeClient {
    fn provider_key(&self) -> &str {
        &self.provider_key
    }

    async fn scan(&self, domain: &str) -> String {
        match self.request_scan(domain).await {
            Ok(response) => match (response.error, response.status) {
                (Some(error), _) => {
                    log::warn!("[{}] scan reported error: {error}", self.provider_key);
                    self.scan_failure(&error)
                }
                (None, Some(status)) => status,
                (None, None) => format!(
                    "{SUCCESS_GLYPH} Scan für '{}' abgeschlossen",
                    self.provider_key
                ),
            },
            Err(e) => {
                self.log_failure("scan", &e);
                self.scan_failure(&e.reason())
            }
        }
    }

    async fn fetch(&self, domain: &str) -> Vec<Record> {
        match self.request_records(domain).await {
            Ok(value) => normalize_records(value),
            Err(e) => {
                self.log_failure("fetch", &e);
                vec![error_record(e.reason())]
            }
        }
    }

    async fn describe(&self) -> AttributeMetadata {
        match self.request_metadata().await {
            Ok(metadata) => metadata,
            Err(e) => {
                self.log_failure("describe", &e);
                AttributeMetadata::from_error(e.reason())
            }
        }
    }
}
