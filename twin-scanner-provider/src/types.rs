use serde::{Deserialize, Serialize};

/// Loosely-typed JSON value as produced by a provider.
///
/// A closed sum: string, number, bool, null, array or object.
pub use serde_json::Value;

/// One structured record returned by `fetch`.
///
/// Key order follows the provider response.
pub type Record = serde_json::Map<String, Value>;

/// Key under which error records carry their message.
pub const ERROR_KEY: &str = "error";
/// Key under which placeholder records carry informational text.
pub const INFO_KEY: &str = "info";
/// Key used when a non-object value has to be wrapped into a record.
pub const VALUE_KEY: &str = "value";

// ============ Scan ============

/// Raw body of `GET /scan`.
///
/// The service answers `{"status": "..."}` on success. Failures carry either an
/// `error` field or, on non-2xx responses, a `detail` field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResponse {
    /// Human-readable status line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Error reported by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error body the service attaches to non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Best message available: `detail`, then `error`.
    pub(crate) fn message(self) -> Option<String> {
        match self.detail {
            Some(Value::String(s)) => Some(s),
            Some(Value::Null) | None => self.error,
            Some(other) => Some(other.to_string()),
        }
    }
}

// ============ Describe ============

/// Provider metadata as returned by `GET /describe`.
///
/// On failure the client returns a value whose [`error`](Self::error) is set
/// and whose other fields are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeMetadata {
    /// Human-readable provider name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Short description of what the attribute captures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Column headings of the provider's records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    /// Set when metadata could not be retrieved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AttributeMetadata {
    /// Metadata carrying only an error message.
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Whether this metadata represents a failed `describe`.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

// ============ Records ============

/// Builds the `{"error": message}` record used for failed fetches.
pub fn error_record(message: impl Into<String>) -> Record {
    let mut record = Record::new();
    record.insert(ERROR_KEY.to_string(), Value::String(message.into()));
    record
}

/// Typed accessors over [`Record`].
pub trait RecordExt {
    /// String value of `key`, if present and a string.
    fn text(&self, key: &str) -> Option<&str>;

    /// Whether this is an error record produced by a failed fetch.
    fn is_error_record(&self) -> bool;

    /// Whether this is an informational placeholder (e.g. "not scanned yet").
    fn is_info_record(&self) -> bool;
}

impl RecordExt for Record {
    fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn is_error_record(&self) -> bool {
        self.len() == 1 && self.text(ERROR_KEY).is_some()
    }

    fn is_info_record(&self) -> bool {
        self.len() == 1 && self.text(INFO_KEY).is_some()
    }
}
