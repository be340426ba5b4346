//! Per-operator session state.

use std::path::PathBuf;
use std::sync::Arc;

use twin_scanner_core::error::CoreResult;
use twin_scanner_core::types::{RecordMap, StatusMap};
use twin_scanner_core::{
    BatchOutcome, ExportEnricher, FilterView, ScanOrchestrator, SelectionSet, ServiceContext,
};

use crate::adapters::ExportSink;

/// One operator's domain, selection, filter and published results.
///
/// Results live only as long as the session; [`close`](Self::close) drops
/// them and invalidates any batch still in flight.
pub struct Session {
    domain: String,
    selection: SelectionSet,
    filter: SelectionSet,
    orchestrator: ScanOrchestrator,
    export_enricher: Arc<ExportEnricher>,
}

impl Session {
    pub(crate) fn new(ctx: Arc<ServiceContext>, export_enricher: Arc<ExportEnricher>) -> Self {
        let selection = SelectionSet::new(&ctx.registry);
        // 默认显示全部已获取的属性
        let filter = SelectionSet::all(&ctx.registry);
        Self {
            domain: String::new(),
            selection,
            filter,
            orchestrator: ScanOrchestrator::new(ctx),
            export_enricher,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn set_domain(&mut self, domain: impl Into<String>) {
        self.domain = domain.into();
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn filter(&self) -> &SelectionSet {
        &self.filter
    }

    pub fn set_attribute(&mut self, name: &str, on: bool) -> CoreResult<()> {
        self.selection.set(name, on)
    }

    pub fn toggle_attribute(&mut self, name: &str) -> CoreResult<bool> {
        self.selection.toggle(name)
    }

    pub fn select_all(&mut self, on: bool) {
        self.selection.set_all(on);
    }

    pub async fn scan(&self) -> BatchOutcome<StatusMap> {
        self.orchestrator.run_scan(&self.domain, &self.selection).await
    }

    pub async fn fetch(&self) -> BatchOutcome<RecordMap> {
        self.orchestrator.run_fetch(&self.domain, &self.selection).await
    }

    /// Flips `name` in the filter and returns what to render now.
    pub async fn toggle_filter(&mut self, name: &str) -> CoreResult<FilterView> {
        self.filter.toggle(name)?;
        Ok(self
            .orchestrator
            .apply_filter(&self.domain, &self.selection, &self.filter)
            .await)
    }

    pub async fn statuses(&self) -> Arc<StatusMap> {
        self.orchestrator.statuses().await
    }

    pub async fn records(&self) -> Arc<RecordMap> {
        self.orchestrator.records().await
    }

    /// Fetches, enriches and hands the export to `sink`; returns where it went.
    pub async fn export(&self, sink: &dyn ExportSink) -> CoreResult<PathBuf> {
        let artifact = self
            .export_enricher
            .export(&self.orchestrator, &self.domain, &self.selection)
            .await
            .inspect_err(|e| {
                if e.is_expected() {
                    log::warn!("Export not produced: {e}");
                } else {
                    log::error!("Export failed: {e}");
                }
            })?;
        sink.persist(&artifact).await
    }

    /// Ends the session. Calls still in flight finish on their own; their
    /// results are discarded.
    pub async fn close(self) {
        self.orchestrator.reset().await;
        log::debug!("Session for '{}' closed", self.domain);
    }
}
