//! Twin Scanner Core Library
//!
//! Attribute dispatch, aggregation, classification and export enrichment
//! for the Digital Twin Scanner:
//! - [`AttributeRegistry`]: display name → provider, built once at startup
//! - [`ScanOrchestrator`]: epoch-guarded scan/fetch batches with bounded fan-out
//! - [`FilterView`]: filter toggles over fetched records
//! - [`ExportEnricher`]: provider descriptions merged into export documents
//!
//! Remote access goes through the `AttributeProvider` trait of
//! `twin-scanner-provider`; nothing here talks HTTP directly.

pub mod config;
pub mod error;
pub mod registry;
pub mod services;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::{FilterContract, OrchestratorConfig, ScannerConfig};
pub use error::{CoreError, CoreResult};
pub use registry::{AttributeDescriptor, AttributeRegistry, AttributeRegistryBuilder};
pub use services::{ExportEnricher, FilterView, ScanOrchestrator, ServiceContext};
pub use types::{BatchOutcome, ExportArtifact, ExportPayload, ScanStatus, SelectionSet, StatusKind};
