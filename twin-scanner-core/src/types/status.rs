//! Scan status classification.

use serde::{Deserialize, Serialize};

use twin_scanner_provider::ERROR_GLYPH;

/// Kind of a classified scan status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Info,
    Error,
}

/// Outcome of one attribute's scan within a batch.
///
/// Produced once by [`ScanStatus::classify`] and never mutated afterwards.
/// Deserializing also goes through `classify`; a serialized `kind` is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StatusLine")]
pub struct ScanStatus {
    kind: StatusKind,
    message: String,
}

#[derive(Deserialize)]
struct StatusLine {
    message: String,
}

impl From<StatusLine> for ScanStatus {
    fn from(line: StatusLine) -> Self {
        Self::classify(line.message)
    }
}

impl ScanStatus {
    /// Classifies a provider status line with [`is_error`].
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        let kind = if is_error(&message) {
            StatusKind::Error
        } else {
            StatusKind::Info
        };
        Self { kind, message }
    }

    pub fn kind(&self) -> StatusKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Whether a raw status line reports a failure.
///
/// Matches status strings already produced by the attribute service, so the
/// checks are exact and case-sensitive: a leading `❌`, the German `Fehler`,
/// or a lowercase `error` anywhere.
pub fn is_error(status: &str) -> bool {
    status.starts_with(ERROR_GLYPH) || status.contains("Fehler") || status.contains("error")
}
