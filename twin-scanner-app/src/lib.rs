//! Application bootstrap for the Digital Twin Scanner.
//!
//! Provides `AppState` (service container), `AppStateBuilder` (configuration
//! and registry injection) and `Session` (per-operator selection and results).

pub mod adapters;
mod session;

use std::sync::Arc;

use twin_scanner_core::error::CoreResult;
use twin_scanner_core::{AttributeRegistry, ExportEnricher, ScannerConfig, ServiceContext};

pub use adapters::{DirectoryExportSink, ExportSink};
pub use session::Session;

/// Platform-agnostic application state.
///
/// Built once at startup via `AppStateBuilder`; every session shares it.
pub struct AppState {
    /// Service context (registry + orchestrator settings)
    pub ctx: Arc<ServiceContext>,
    /// Configuration the state was built from
    pub config: ScannerConfig,
    /// Export enrichment service
    pub export_enricher: Arc<ExportEnricher>,
}

impl AppState {
    /// Opens a session with nothing selected and an empty domain.
    pub fn open_session(&self) -> Session {
        Session::new(Arc::clone(&self.ctx), Arc::clone(&self.export_enricher))
    }

    pub fn registry(&self) -> &AttributeRegistry {
        &self.ctx.registry
    }
}

/// Builder for constructing `AppState`.
///
/// # Optional
/// - `config` — defaults to `ScannerConfig::default()`
/// - `registry` — defaults to `AttributeRegistry::standard` over `config.client`
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<ScannerConfig>,
    registry: Option<Arc<AttributeRegistry>>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(mut self, config: ScannerConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn registry(mut self, registry: Arc<AttributeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::Provider` if the shared HTTP client cannot be built.
    pub fn build(self) -> CoreResult<AppState> {
        let config = self.config.unwrap_or_default();
        let registry = match self.registry {
            Some(registry) => registry,
            None => Arc::new(AttributeRegistry::standard(&config.client)?),
        };
        log::info!(
            "Scanner ready: {} attribute(s), service at {}",
            registry.len(),
            config.client.base_url
        );

        let ctx = Arc::new(ServiceContext::new(registry, config.orchestrator.clone()));
        let export_enricher = Arc::new(ExportEnricher::new(Arc::clone(&ctx)));

        Ok(AppState {
            ctx,
            config,
            export_enricher,
        })
    }
}
