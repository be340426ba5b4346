//! Filesystem export sink.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use twin_scanner_core::error::{CoreError, CoreResult};
use twin_scanner_core::ExportArtifact;

use super::ExportSink;

/// Writes each artifact as `<dir>/<file_name>`, replacing an existing file.
#[derive(Debug, Clone)]
pub struct DirectoryExportSink {
    dir: PathBuf,
}

impl DirectoryExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn target(&self, file_name: &str) -> CoreResult<PathBuf> {
        let plain = Path::new(file_name)
            .file_name()
            .is_some_and(|name| name == file_name);
        if !plain || file_name.contains(['/', '\\']) {
            return Err(CoreError::StorageError(format!(
                "invalid export file name: {file_name}"
            )));
        }
        Ok(self.dir.join(file_name))
    }
}

#[async_trait]
impl ExportSink for DirectoryExportSink {
    async fn persist(&self, artifact: &ExportArtifact) -> CoreResult<PathBuf> {
        let path = self.target(&artifact.file_name)?;
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            CoreError::StorageError(format!("failed to create {}: {e}", self.dir.display()))
        })?;
        tokio::fs::write(&path, &artifact.bytes).await.map_err(|e| {
            CoreError::StorageError(format!("failed to write {}: {e}", path.display()))
        })?;
        log::info!("Export written to {}", path.display());
        Ok(path)
    }
}
