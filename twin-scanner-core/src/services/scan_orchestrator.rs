//! Batch scan/fetch orchestration.
//!
//! Each `run_*` call is one batch: it takes a fresh epoch, fans out to the
//! providers of the active attributes with bounded concurrency, waits for
//! every call, and only then publishes the complete map. A batch whose
//! epoch is no longer current when it finishes is discarded.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use futures::FutureExt;
use indexmap::{IndexMap, IndexSet};
use tokio::sync::RwLock;
use twin_scanner_provider::{error_record, AttributeProvider, ERROR_GLYPH};

use crate::services::ServiceContext;
use crate::types::{BatchOutcome, RecordMap, ScanStatus, SelectionSet, StatusMap};

/// Snapshot currently visible to readers.
struct Published<T> {
    epoch: u64,
    results: Arc<T>,
}

impl<T: Default> Published<T> {
    fn empty(epoch: u64) -> Self {
        Self {
            epoch,
            results: Arc::new(T::default()),
        }
    }
}

/// Drives scan and fetch batches and holds their published results.
///
/// Scan and fetch batches use independent epochs: a fetch never supersedes
/// a scan and vice versa.
pub struct ScanOrchestrator {
    ctx: Arc<ServiceContext>,
    scan_epoch: AtomicU64,
    fetch_epoch: AtomicU64,
    statuses: RwLock<Published<StatusMap>>,
    records: RwLock<Published<RecordMap>>,
}

impl ScanOrchestrator {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            ctx,
            scan_epoch: AtomicU64::new(0),
            fetch_epoch: AtomicU64::new(0),
            statuses: RwLock::new(Published::empty(0)),
            records: RwLock::new(Published::empty(0)),
        }
    }

    pub fn context(&self) -> &Arc<ServiceContext> {
        &self.ctx
    }

    /// Attributes switched on in `selection`, in selection order, using the
    /// registry's spelling. Each attribute appears at most once.
    pub fn select_active(&self, selection: &SelectionSet) -> IndexSet<String> {
        selection
            .active()
            .map(|name| {
                self.ctx
                    .registry
                    .descriptor(name)
                    .map_or_else(|| name.to_string(), |d| d.display_name.clone())
            })
            .collect()
    }

    /// Scans `domain` for every active attribute and publishes the
    /// classified statuses.
    pub async fn run_scan(&self, domain: &str, selection: &SelectionSet) -> BatchOutcome<StatusMap> {
        let Some(domain) = non_blank(domain) else {
            log::warn!("Scan skipped: no domain given");
            return BatchOutcome::Skipped;
        };
        let epoch = next_epoch(&self.scan_epoch);
        let targets = self.targets(selection);
        log::info!(
            "Scan batch {epoch} for {domain}: {} attribute(s)",
            targets.len()
        );

        let results: StatusMap = self
            .fan_out(targets, |name, provider| async move {
                let key = provider.provider_key().to_string();
                let line = guarded(&name, "scan", provider.scan(domain))
                    .await
                    .unwrap_or_else(|reason| {
                        format!("{ERROR_GLYPH} Fehler bei Scan ({key}): {reason}")
                    });
                let status = ScanStatus::classify(line);
                if status.is_error() {
                    log::warn!("[{key}] {}", status.message());
                }
                (name, status)
            })
            .await;

        publish(&self.statuses, &self.scan_epoch, epoch, results).await
    }

    /// Fetches records of every active attribute for `domain` and publishes
    /// them.
    pub async fn run_fetch(
        &self,
        domain: &str,
        selection: &SelectionSet,
    ) -> BatchOutcome<RecordMap> {
        let Some(domain) = non_blank(domain) else {
            log::warn!("Fetch skipped: no domain given");
            return BatchOutcome::Skipped;
        };
        let epoch = next_epoch(&self.fetch_epoch);
        let targets = self.targets(selection);
        log::info!(
            "Fetch batch {epoch} for {domain}: {} attribute(s)",
            targets.len()
        );

        let results: RecordMap = self
            .fan_out(targets, |name, provider| async move {
                let records = guarded(&name, "fetch", provider.fetch(domain))
                    .await
                    .unwrap_or_else(|reason| vec![error_record(reason)]);
                (name, records)
            })
            .await;

        publish(&self.records, &self.fetch_epoch, epoch, results).await
    }

    /// Last published status map.
    pub async fn statuses(&self) -> Arc<StatusMap> {
        Arc::clone(&self.statuses.read().await.results)
    }

    /// Last published record map.
    pub async fn records(&self) -> Arc<RecordMap> {
        Arc::clone(&self.records.read().await.results)
    }

    /// Ends the session: clears both maps and invalidates in-flight batches.
    ///
    /// Outstanding provider calls keep running; their results are dropped
    /// when they arrive.
    pub async fn reset(&self) {
        let scan_epoch = clear(&self.statuses, &self.scan_epoch).await;
        let fetch_epoch = clear(&self.records, &self.fetch_epoch).await;
        log::debug!("Orchestrator reset (scan epoch {scan_epoch}, fetch epoch {fetch_epoch})");
    }

    /// Resolvable active attributes with their providers.
    fn targets(&self, selection: &SelectionSet) -> Vec<(String, Arc<dyn AttributeProvider>)> {
        self.select_active(selection)
            .into_iter()
            .filter_map(|name| self.ctx.resolve(&name).map(|provider| (name, provider)))
            .collect()
    }

    /// Runs `call` for every target, at most `max_concurrency` at a time,
    /// and collects the results in target order.
    async fn fan_out<T, F, Fut>(
        &self,
        targets: Vec<(String, Arc<dyn AttributeProvider>)>,
        call: F,
    ) -> IndexMap<String, T>
    where
        F: Fn(String, Arc<dyn AttributeProvider>) -> Fut,
        Fut: Future<Output = (String, T)>,
    {
        stream::iter(targets.into_iter().map(|(name, provider)| call(name, provider)))
            .buffered(self.ctx.config.concurrency())
            .collect()
            .await
    }
}

fn non_blank(domain: &str) -> Option<&str> {
    let trimmed = domain.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn next_epoch(counter: &AtomicU64) -> u64 {
    counter.fetch_add(1, Ordering::AcqRel) + 1
}

/// Awaits one provider call, turning a panic into an error reason.
async fn guarded<T>(
    name: &str,
    operation: &str,
    call: impl Future<Output = T>,
) -> Result<T, String> {
    AssertUnwindSafe(call).catch_unwind().await.map_err(|payload| {
        let reason = panic_message(payload.as_ref());
        log::error!("{operation} for '{name}' panicked: {reason}");
        format!("provider panicked: {reason}")
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// Empties `slot` under a fresh epoch.
///
/// The epoch is taken while the write lock is held, so no batch can publish
/// between the bump and the clear.
async fn clear<T: Default>(slot: &RwLock<Published<T>>, current: &AtomicU64) -> u64 {
    let mut published = slot.write().await;
    let epoch = next_epoch(current);
    *published = Published::empty(epoch);
    epoch
}

/// Replaces the published snapshot if `epoch` is still the newest batch.
async fn publish<T>(
    slot: &RwLock<Published<T>>,
    current: &AtomicU64,
    epoch: u64,
    results: T,
) -> BatchOutcome<T> {
    let mut published = slot.write().await;
    if current.load(Ordering::Acquire) != epoch || published.epoch >= epoch {
        log::warn!("Batch {epoch} superseded, discarding its results");
        return BatchOutcome::Superseded { epoch };
    }
    let results = Arc::new(results);
    *published = Published {
        epoch,
        results: Arc::clone(&results),
    };
    log::debug!("Batch {epoch} published");
    BatchOutcome::Published { epoch, results }
}
