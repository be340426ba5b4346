//! Orchestrator and scanner configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use twin_scanner_provider::ClientConfig;

use crate::error::{CoreError, CoreResult};

/// Environment variable overriding [`ClientConfig::base_url`].
pub const ENV_BASE_URL: &str = "TWIN_SCANNER_BASE_URL";
/// Environment variable overriding [`OrchestratorConfig::max_concurrency`].
pub const ENV_MAX_CONCURRENCY: &str = "TWIN_SCANNER_MAX_CONCURRENCY";

/// 默认最大并发数
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;
/// 默认导出文件名前缀
pub const DEFAULT_EXPORT_PREFIX: &str = "digital_twin";

/// What toggling the filter view does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterContract {
    /// Show the cached records of the filtered attributes; no remote calls.
    #[default]
    Cached,
    /// Re-run the fetch over the selection set and ignore the filter.
    Refetch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrchestratorConfig {
    /// Upper bound on simultaneous provider calls within one batch.
    pub max_concurrency: usize,
    pub filter_contract: FilterContract,
    /// Export file name prefix.
    pub export_prefix: String,
    /// Indent exported JSON.
    pub pretty_export: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            filter_contract: FilterContract::default(),
            export_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
            pretty_export: false,
        }
    }
}

impl OrchestratorConfig {
    /// `max_concurrency`, never below 1.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.max_concurrency.max(1)
    }
}

/// Complete scanner configuration, as read from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScannerConfig {
    pub client: ClientConfig,
    pub orchestrator: OrchestratorConfig,
}

impl ScannerConfig {
    /// Reads `path` (defaults when absent or missing), then applies the
    /// process environment overrides.
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    CoreError::ConfigError(format!("failed to read {}: {e}", path.display()))
                })?;
                log::debug!("Loading configuration from {}", path.display());
                Self::from_json_str(&raw)?
            }
            Some(path) => {
                log::info!(
                    "Configuration file {} not found, using defaults",
                    path.display()
                );
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> CoreResult<Self> {
        serde_json::from_str(raw).map_err(|e| CoreError::ConfigError(e.to_string()))
    }

    /// Applies overrides from `lookup` (normally the process environment).
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> CoreResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.client.base_url = base_url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_MAX_CONCURRENCY) {
            self.orchestrator.max_concurrency = raw.trim().parse().map_err(|_| {
                CoreError::ConfigError(format!("{ENV_MAX_CONCURRENCY} must be a number, got {raw:?}"))
            })?;
        }
        Ok(())
    }
}
