//! Filter view over fetched records.

use std::sync::Arc;

use crate::config::FilterContract;
use crate::services::ScanOrchestrator;
use crate::types::{RecordMap, SelectionSet};

/// Records to render after a filter toggle.
#[derive(Debug, Clone)]
pub struct FilterView {
    pub records: Arc<RecordMap>,
    /// Whether producing this view went to the network.
    pub refetched: bool,
}

impl ScanOrchestrator {
    /// Applies a filter toggle under the configured [`FilterContract`].
    ///
    /// `Cached` narrows the published records to the attributes switched on
    /// in `filter` and makes no remote calls. `Refetch` runs a fresh fetch
    /// over `selection` and ignores `filter` entirely.
    pub async fn apply_filter(
        &self,
        domain: &str,
        selection: &SelectionSet,
        filter: &SelectionSet,
    ) -> FilterView {
        match self.context().config.filter_contract {
            FilterContract::Cached => {
                let cached = self.records().await;
                let records = cached
                    .iter()
                    .filter(|(name, _)| filter.is_selected(name))
                    .map(|(name, records)| (name.clone(), records.clone()))
                    .collect();
                FilterView {
                    records: Arc::new(records),
                    refetched: false,
                }
            }
            FilterContract::Refetch => {
                log::debug!("Filter toggled, refetching {domain} over the selection set");
                let records = match self.run_fetch(domain, selection).await.into_results() {
                    Some(records) => records,
                    None => self.records().await,
                };
                FilterView {
                    records,
                    refetched: true,
                }
            }
        }
    }
}
