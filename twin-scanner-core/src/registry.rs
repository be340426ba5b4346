//! Attribute registry: display name → provider.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use twin_scanner_provider::{create_http_client, create_provider, AttributeProvider, ClientConfig};

use crate::error::{CoreError, CoreResult};

/// Attributes exposed by the attribute service, in display order.
pub const STANDARD_ATTRIBUTES: &[(&str, &str)] = &[
    ("A-Record", "A"),
    ("AAAA-Record", "AAAA"),
    ("MX-Record", "MX"),
    ("NS-Record", "NS"),
    ("TXT-Record", "TXT"),
    ("SOA-Record", "SOA"),
    ("PTR-Record", "PTR"),
    ("Subdomain", "SUBDOMAIN"),
    ("Zertifikat", "CERTIFICATE"),
    ("Endpunkt", "ENDPOINT"),
    ("E-Mail", "EMAIL"),
    ("Telefonnummer", "PHONE"),
    ("Dienst", "SERVICE"),
];

/// Case-folded key used for every registry lookup.
pub(crate) fn canonical_key(display_name: &str) -> String {
    display_name.to_lowercase()
}

/// One registered attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDescriptor {
    /// Unique name used by the UI, the selection set and result maps.
    pub display_name: String,
    /// Key the remote service knows the attribute by.
    pub provider_key: String,
}

struct Entry {
    descriptor: AttributeDescriptor,
    provider: Arc<dyn AttributeProvider>,
}

/// Immutable table mapping display names to their providers.
///
/// Built once at startup and shared by reference (`Arc`). Lookups are
/// case-insensitive through a single case-folded index; there is no
/// mutation API after [`AttributeRegistryBuilder::build`].
pub struct AttributeRegistry {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl AttributeRegistry {
    pub fn builder() -> AttributeRegistryBuilder {
        AttributeRegistryBuilder::default()
    }

    /// Registry with every [`STANDARD_ATTRIBUTES`] entry, all sharing one HTTP connection pool.
    pub fn standard(config: &ClientConfig) -> CoreResult<Self> {
        let http = create_http_client(config)?;
        STANDARD_ATTRIBUTES
            .iter()
            .fold(Self::builder(), |builder, (display_name, provider_key)| {
                builder.register(*display_name, create_provider(&http, config, provider_key))
            })
            .build()
    }

    /// Provider registered under `display_name`, matched case-insensitively.
    ///
    /// Absence is not an error; callers skip the attribute.
    pub fn lookup(&self, display_name: &str) -> Option<Arc<dyn AttributeProvider>> {
        self.entry(display_name)
            .map(|entry| Arc::clone(&entry.provider))
    }

    /// Descriptor registered under `display_name`, matched case-insensitively.
    pub fn descriptor(&self, display_name: &str) -> Option<&AttributeDescriptor> {
        self.entry(display_name).map(|entry| &entry.descriptor)
    }

    pub fn contains(&self, display_name: &str) -> bool {
        self.entry(display_name).is_some()
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &AttributeDescriptor> {
        self.entries.iter().map(|entry| &entry.descriptor)
    }

    /// Display names in registration order.
    pub fn display_names(&self) -> impl Iterator<Item = &str> {
        self.descriptors().map(|d| d.display_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, display_name: &str) -> Option<&Entry> {
        self.index
            .get(&canonical_key(display_name))
            .map(|&idx| &self.entries[idx])
    }
}

impl std::fmt::Debug for AttributeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| &e.descriptor))
            .finish()
    }
}

/// Collects registrations; [`build`](Self::build) freezes them.
#[derive(Default)]
pub struct AttributeRegistryBuilder {
    pending: Vec<(String, Arc<dyn AttributeProvider>)>,
}

impl AttributeRegistryBuilder {
    #[must_use]
    pub fn register(
        mut self,
        display_name: impl Into<String>,
        provider: Arc<dyn AttributeProvider>,
    ) -> Self {
        self.pending.push((display_name.into(), provider));
        self
    }

    /// Freezes the registry. Fails if two names fold to the same key.
    pub fn build(self) -> CoreResult<AttributeRegistry> {
        let mut entries = Vec::with_capacity(self.pending.len());
        let mut index = HashMap::with_capacity(self.pending.len());

        for (display_name, provider) in self.pending {
            let key = canonical_key(&display_name);
            if index.contains_key(&key) {
                return Err(CoreError::DuplicateAttribute(display_name));
            }
            index.insert(key, entries.len());
            entries.push(Entry {
                descriptor: AttributeDescriptor {
                    provider_key: provider.provider_key().to_string(),
                    display_name,
                },
                provider,
            });
        }

        log::debug!("Attribute registry built with {} entries", entries.len());
        Ok(AttributeRegistry { entries, index })
    }
}
