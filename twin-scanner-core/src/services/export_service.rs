//! Export enrichment: provider descriptions merged with fetched records.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use twin_scanner_provider::Value;

use crate::error::{CoreError, CoreResult};
use crate::services::{ScanOrchestrator, ServiceContext};
use crate::types::{
    description_record, AttributeSequences, BatchOutcome, ExportArtifact, ExportPayload,
    RecordMap, SelectionSet,
};

/// Builds and serializes export documents.
pub struct ExportEnricher {
    ctx: Arc<ServiceContext>,
}

impl ExportEnricher {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Prepends `{"description": ...}` to each attribute's records.
    ///
    /// Descriptions are requested concurrently. Attributes without a
    /// registered provider are copied through unchanged.
    pub async fn build(&self, domain: &str, fetched: &RecordMap) -> ExportPayload {
        let attributes: AttributeSequences = stream::iter(fetched.iter())
            .map(|(name, records)| async move {
                let mut sequence = Vec::with_capacity(records.len() + 1);
                if let Some(provider) = self.ctx.resolve(name) {
                    let metadata = provider.describe().await;
                    if let Some(error) = &metadata.error {
                        log::warn!(
                            "[{}] describe failed, exporting without description: {error}",
                            provider.provider_key()
                        );
                    }
                    sequence.push(Value::Object(description_record(
                        metadata.description.as_deref(),
                    )));
                }
                sequence.extend(records.iter().cloned().map(Value::Object));
                (name.clone(), sequence)
            })
            .buffered(self.ctx.config.concurrency())
            .collect()
            .await;

        ExportPayload::for_domain(domain, attributes)
    }

    /// UTF-8 JSON, indented when `pretty`.
    pub fn serialize(payload: &ExportPayload, pretty: bool) -> CoreResult<Vec<u8>> {
        let bytes = if pretty {
            serde_json::to_vec_pretty(payload)
        } else {
            serde_json::to_vec(payload)
        };
        bytes.map_err(|e| CoreError::SerializationError(e.to_string()))
    }

    /// Fetches the active attributes of `domain` and turns them into an
    /// export artifact.
    ///
    /// Fails with an expected error when the domain is blank, nothing is
    /// selected, the fetch is superseded, or nothing came back.
    pub async fn export(
        &self,
        orchestrator: &ScanOrchestrator,
        domain: &str,
        selection: &SelectionSet,
    ) -> CoreResult<ExportArtifact> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(CoreError::EmptyDomain);
        }
        if selection.active().next().is_none() {
            log::warn!("Export of {domain} skipped: no attributes selected");
            return Err(CoreError::NoAttributesSelected);
        }

        let fetched = match orchestrator.run_fetch(domain, selection).await {
            BatchOutcome::Published { results, .. } => results,
            BatchOutcome::Superseded { epoch } => return Err(CoreError::BatchSuperseded(epoch)),
            BatchOutcome::Skipped => return Err(CoreError::EmptyDomain),
        };
        if fetched.values().all(Vec::is_empty) {
            log::warn!("Export of {domain} skipped: fetch returned no records");
            return Err(CoreError::EmptyResult(domain.to_string()));
        }

        let payload = self.build(domain, &fetched).await;
        let bytes = Self::serialize(&payload, self.ctx.config.pretty_export)?;
        let file_name = ExportArtifact::file_name_for(&self.ctx.config.export_prefix, domain);
        log::info!("Export {file_name} prepared ({} bytes)", bytes.len());

        Ok(ExportArtifact { file_name, bytes })
    }
}
