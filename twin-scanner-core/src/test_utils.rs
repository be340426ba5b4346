//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use twin_scanner_provider::{AttributeMetadata, AttributeProvider, Record, Value};

use crate::config::OrchestratorConfig;
use crate::registry::AttributeRegistry;
use crate::services::ServiceContext;

// ===== ConcurrencyGauge =====

/// Tracks how many mock calls run at the same time.
#[derive(Default)]
pub struct ConcurrencyGauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl ConcurrencyGauge {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

// ===== MockAttributeProvider =====

/// Scriptable provider.
///
/// `*_sequence` scripts are consumed one entry per call; once exhausted the
/// fixed value applies.
pub struct MockAttributeProvider {
    key: String,
    status: String,
    statuses: Mutex<VecDeque<String>>,
    records: Vec<Record>,
    metadata: AttributeMetadata,
    delay: Duration,
    delays: Mutex<VecDeque<Duration>>,
    panics: bool,
    gauge: Option<Arc<ConcurrencyGauge>>,
    last_domain: Mutex<Option<String>>,
    scan_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    describe_calls: AtomicUsize,
}

impl MockAttributeProvider {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        let mut record = Record::new();
        record.insert("value".into(), Value::String(key.clone()));
        Self {
            status: format!("✅ Scan für '{key}' abgeschlossen"),
            statuses: Mutex::new(VecDeque::new()),
            records: vec![record],
            metadata: AttributeMetadata::default(),
            delay: Duration::ZERO,
            delays: Mutex::new(VecDeque::new()),
            panics: false,
            gauge: None,
            last_domain: Mutex::new(None),
            scan_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            describe_calls: AtomicUsize::new(0),
            key,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    #[must_use]
    pub fn with_status_sequence<const N: usize>(self, statuses: [&str; N]) -> Self {
        *self.statuses.lock().unwrap() = statuses.iter().map(ToString::to_string).collect();
        self
    }

    /// Records returned by `fetch`; every value must be a JSON object.
    #[must_use]
    pub fn with_records(mut self, records: Vec<Value>) -> Self {
        self.records = records
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.metadata.description = Some(description.to_string());
        self
    }

    #[must_use]
    pub fn with_describe_error(mut self, message: &str) -> Self {
        self.metadata = AttributeMetadata::from_error(message);
        self
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn with_delay_sequence<const N: usize>(self, delays: [Duration; N]) -> Self {
        *self.delays.lock().unwrap() = delays.into_iter().collect();
        self
    }

    /// Every operation panics.
    #[must_use]
    pub fn panicking(mut self) -> Self {
        self.panics = true;
        self
    }

    #[must_use]
    pub fn with_gauge(mut self, gauge: Arc<ConcurrencyGauge>) -> Self {
        self.gauge = Some(gauge);
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn into_arc(self) -> Arc<dyn AttributeProvider> {
        Arc::new(self)
    }

    pub fn scan_calls(&self) -> usize {
        self.scan_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn describe_calls(&self) -> usize {
        self.describe_calls.load(Ordering::SeqCst)
    }

    pub fn last_domain(&self) -> Option<String> {
        self.last_domain.lock().unwrap().clone()
    }

    /// Common prologue of every call: bookkeeping, delay, optional panic.
    async fn call(&self, counter: &AtomicUsize, domain: Option<&str>) {
        counter.fetch_add(1, Ordering::SeqCst);
        if let Some(domain) = domain {
            *self.last_domain.lock().unwrap() = Some(domain.to_string());
        }
        let delay = self.delays.lock().unwrap().pop_front().unwrap_or(self.delay);

        if let Some(gauge) = &self.gauge {
            gauge.enter();
        }
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if let Some(gauge) = &self.gauge {
            gauge.leave();
        }

        assert!(!self.panics, "mock provider {} panicked", self.key);
    }
}

#[async_trait]
impl AttributeProvider for MockAttributeProvider {
    fn provider_key(&self) -> &str {
        &self.key
    }

    async fn scan(&self, domain: &str) -> String {
        let scripted = self.statuses.lock().unwrap().pop_front();
        self.call(&self.scan_calls, Some(domain)).await;
        scripted.unwrap_or_else(|| self.status.clone())
    }

    async fn fetch(&self, domain: &str) -> Vec<Record> {
        self.call(&self.fetch_calls, Some(domain)).await;
        self.records.clone()
    }

    async fn describe(&self) -> AttributeMetadata {
        self.call(&self.describe_calls, None).await;
        self.metadata.clone()
    }
}

// ===== 工厂方法 =====

/// Registry of default mocks, provider key = display name up to the first `-`.
pub fn registry_of(names: &[&str]) -> AttributeRegistry {
    names
        .iter()
        .fold(AttributeRegistry::builder(), |builder, name| {
            let key = name.split('-').next().unwrap_or(*name).to_uppercase();
            builder.register(*name, MockAttributeProvider::new(key).into_arc())
        })
        .build()
        .unwrap()
}

/// Service context around `registry` with the given concurrency bound.
pub fn context(registry: AttributeRegistry, max_concurrency: usize) -> Arc<ServiceContext> {
    Arc::new(ServiceContext::new(
        Arc::new(registry),
        OrchestratorConfig {
            max_concurrency,
            ..OrchestratorConfig::default()
        },
    ))
}
