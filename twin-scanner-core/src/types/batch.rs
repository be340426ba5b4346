//! Batch results.

use std::sync::Arc;

use indexmap::IndexMap;
use twin_scanner_provider::Record;

use super::ScanStatus;

/// Classified scan statuses keyed by display name, in registry order.
pub type StatusMap = IndexMap<String, ScanStatus>;

/// Fetched records keyed by display name, in registry order.
pub type RecordMap = IndexMap<String, Vec<Record>>;

/// What happened to one orchestrated batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome<T> {
    /// Blank domain: nothing ran, nothing was replaced.
    Skipped,
    /// The batch completed and its map is now the published snapshot.
    Published { epoch: u64, results: Arc<T> },
    /// A newer batch started first; these results were discarded.
    Superseded { epoch: u64 },
}

impl<T> BatchOutcome<T> {
    /// Published snapshot, if this batch won.
    pub fn results(&self) -> Option<&Arc<T>> {
        match self {
            Self::Published { results, .. } => Some(results),
            _ => None,
        }
    }

    pub fn into_results(self) -> Option<Arc<T>> {
        match self {
            Self::Published { results, .. } => Some(results),
            _ => None,
        }
    }

    pub fn epoch(&self) -> Option<u64> {
        match self {
            Self::Skipped => None,
            Self::Published { epoch, .. } | Self::Superseded { epoch } => Some(*epoch),
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published { .. })
    }
}
