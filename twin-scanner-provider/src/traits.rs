use async_trait::async_trait;

use crate::types::{AttributeMetadata, Record};

/// Remote access contract for one attribute.
///
/// All three operations suspend on network I/O and never fail: transport and
/// decoding failures are folded into the returned data.
///
/// - `scan` → a status line prefixed with the error glyph
/// - `fetch` → a one-element sequence holding an `{"error": ...}` record
/// - `describe` → metadata with only [`error`](AttributeMetadata::error) set
#[async_trait]
pub trait AttributeProvider: Send + Sync {
    /// Opaque key the remote service knows this attribute by (e.g. `"A"`, `"SUBDOMAIN"`).
    fn provider_key(&self) -> &str;

    /// Triggers a side-effecting remote scan and returns one human-readable status line.
    async fn scan(&self, domain: &str) -> String;

    /// Retrieves the records persisted by earlier scans, always as a sequence.
    async fn fetch(&self, domain: &str) -> Vec<Record>;

    /// Retrieves provider metadata.
    async fn describe(&self) -> AttributeMetadata;
}
