//! Export related types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use twin_scanner_provider::{Record, Value};

/// Key of the leading record in every exported attribute sequence.
pub const DESCRIPTION_KEY: &str = "description";

/// Description used when the provider returns none.
pub const NO_DESCRIPTION: &str = "No description available";

/// Attribute sequences of one domain, keyed by display name.
pub type AttributeSequences = IndexMap<String, Vec<Value>>;

/// Export document: `domain → attribute → [description, records...]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportPayload(IndexMap<String, AttributeSequences>);

impl ExportPayload {
    /// Payload for one domain.
    pub fn for_domain(domain: impl Into<String>, attributes: AttributeSequences) -> Self {
        let mut inner = IndexMap::with_capacity(1);
        inner.insert(domain.into(), attributes);
        Self(inner)
    }

    /// Sequences of `domain`.
    pub fn domain(&self, domain: &str) -> Option<&AttributeSequences> {
        self.0.get(domain)
    }

    /// Sequence exported for `attribute` under `domain`.
    pub fn sequence(&self, domain: &str, attribute: &str) -> Option<&[Value]> {
        self.domain(domain)?.get(attribute).map(Vec::as_slice)
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(IndexMap::is_empty)
    }
}

/// Leading record of an exported sequence: `{"description": "<text>"}`.
pub fn description_record(description: Option<&str>) -> Record {
    let mut record = Record::new();
    record.insert(
        DESCRIPTION_KEY.to_string(),
        Value::String(description.unwrap_or(NO_DESCRIPTION).to_string()),
    );
    record
}

/// Serialized export ready for a persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested file name, `<prefix>_<domain>.json`.
    pub file_name: String,
    /// UTF-8 JSON.
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn file_name_for(prefix: &str, domain: &str) -> String {
        format!("{prefix}_{domain}.json")
    }
}
