//! Persistence adapters for export artifacts.

mod directory_export_sink;

pub use directory_export_sink::DirectoryExportSink;

use std::path::PathBuf;

use async_trait::async_trait;
use twin_scanner_core::error::CoreResult;
use twin_scanner_core::ExportArtifact;

/// Where serialized exports end up.
///
/// Frontends plug in their own storage (file dialog, download, object store).
#[async_trait]
pub trait ExportSink: Send + Sync {
    /// Stores `artifact` and returns its location.
    async fn persist(&self, artifact: &ExportArtifact) -> CoreResult<PathBuf>;
}
