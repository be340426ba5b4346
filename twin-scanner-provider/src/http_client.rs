//! Shared HTTP request handling for the attribute service.
//!
//! One place for sending, logging, status mapping and retrying, so the
//! per-operation code in [`crate::client`] only builds requests and decodes bodies.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::ProviderError;
use crate::types::ErrorBody;
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Sends a request and returns `(status_code, body)`.
    ///
    /// Transport failures become `NetworkError` / `Timeout`, HTTP 429 becomes
    /// `RateLimited` and 502–504 become `NetworkError` so the retry loop picks
    /// them up. Every other status is returned to the caller untouched.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        provider_key: &str,
        operation: &str,
    ) -> Result<(u16, String), ProviderError> {
        log::debug!("[{provider_key}] GET /{operation}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    provider: provider_key.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ProviderError::NetworkError {
                    provider: provider_key.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{provider_key}] Response Status: {status_code}");

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status_code == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_key}] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(ProviderError::RateLimited {
                provider: provider_key.to_string(),
                retry_after,
                raw_message: Some(body),
            });
        }

        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_key}] Server unavailable (HTTP {status_code})");
            return Err(ProviderError::NetworkError {
                provider: provider_key.to_string(),
                detail: format!("HTTP {status_code}: {}", truncate_for_log(&body)),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                provider: provider_key.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[{provider_key}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Rejects non-2xx responses, extracting the service's `detail` message.
    ///
    /// 404 means the service has no provider for the key.
    pub fn ensure_success(
        status_code: u16,
        response_text: &str,
        provider_key: &str,
    ) -> Result<(), ProviderError> {
        if (200..300).contains(&status_code) {
            return Ok(());
        }

        let message = serde_json::from_str::<ErrorBody>(response_text)
            .ok()
            .and_then(ErrorBody::message)
            .unwrap_or_else(|| truncate_for_log(response_text));

        if status_code == 404 {
            Err(ProviderError::UnknownAttribute {
                provider: provider_key.to_string(),
                message,
            })
        } else {
            Err(ProviderError::HttpStatus {
                provider: provider_key.to_string(),
                status: status_code,
                message,
            })
        }
    }

    /// Parse JSON response
    pub fn parse_json<T>(response_text: &str, provider_key: &str) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{provider_key}] JSON parse failed: {e}");
            log::error!(
                "[{provider_key}] Raw response: {}",
                truncate_for_log(response_text)
            );
            ProviderError::ParseError {
                provider: provider_key.to_string(),
                detail: e.to_string(),
            }
        })
    }

    /// [`execute_request`](Self::execute_request) with retries for transient failures.
    ///
    /// # Retry strategy
    /// - Only `NetworkError`, `Timeout` and `RateLimited` are retried
    /// - Exponential backoff: 100ms, 200ms, 400ms, ... (maximum 10 seconds)
    /// - `Retry-After` is honoured up to 30 seconds
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        provider_key: &str,
        operation: &str,
        max_retries: u32,
    ) -> Result<(u16, String), ProviderError> {
        if max_retries == 0 {
            return Self::execute_request(request_builder, provider_key, operation).await;
        }

        let mut last_error = None;

        for attempt in 0..=max_retries {
            // RequestBuilder can only be sent once
            let Some(req) = request_builder.try_clone() else {
                log::warn!("[{provider_key}] Cannot clone request, disabling retry");
                return Self::execute_request(request_builder, provider_key, operation).await;
            };

            match Self::execute_request(req, provider_key, operation).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < max_retries && e.is_retryable() => {
                    let delay = retry_delay(&e, attempt);
                    log::warn!(
                        "[{}] Request failed (attempt {}/{}), retrying in {:.1}s: {}",
                        provider_key,
                        attempt + 1,
                        max_retries,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ProviderError::NetworkError {
            provider: provider_key.to_string(),
            detail: "All retries exhausted with no error captured".to_string(),
        }))
    }
}

/// `Retry-After` (capped at 30s) for rate limits, exponential backoff otherwise.
fn retry_delay(error: &ProviderError, attempt: u32) -> Duration {
    if let ProviderError::RateLimited {
        retry_after: Some(secs),
        ..
    } = error
    {
        Duration::from_secs((*secs).min(30))
    } else {
        backoff_delay(attempt)
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20); // 防止 2^attempt 溢出
    let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
    Duration::from_millis(delay_ms.min(10_000))
}
