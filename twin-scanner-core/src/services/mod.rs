//! 业务逻辑服务层

mod export_service;
mod filter_view;
mod scan_orchestrator;

pub use export_service::ExportEnricher;
pub use filter_view::FilterView;
pub use scan_orchestrator::ScanOrchestrator;

use std::sync::Arc;

use twin_scanner_provider::AttributeProvider;

use crate::config::OrchestratorConfig;
use crate::registry::AttributeRegistry;

/// 服务上下文 - 持有所有依赖
///
/// Built once by the application layer and shared by every service.
pub struct ServiceContext {
    /// Attribute registry, immutable after startup.
    pub registry: Arc<AttributeRegistry>,
    /// Orchestrator settings.
    pub config: OrchestratorConfig,
}

impl ServiceContext {
    #[must_use]
    pub fn new(registry: Arc<AttributeRegistry>, config: OrchestratorConfig) -> Self {
        Self { registry, config }
    }

    /// Provider for `display_name`, or `None` after logging the skip.
    pub(crate) fn resolve(&self, display_name: &str) -> Option<Arc<dyn AttributeProvider>> {
        let provider = self.registry.lookup(display_name);
        if provider.is_none() {
            log::warn!("Attribute '{display_name}' is not registered, skipping");
        }
        provider
    }
}
