//! Per-session attribute selection.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::registry::{canonical_key, AttributeRegistry};

/// Which registered attributes the operator has switched on.
///
/// Keys are exactly the registry's display names, in registry order; there
/// is no way to insert a name the registry does not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionSet {
    flags: IndexMap<String, bool>,
}

impl SelectionSet {
    /// Every registered attribute, all switched off.
    pub fn new(registry: &AttributeRegistry) -> Self {
        Self::with_default(registry, false)
    }

    /// Every registered attribute, all switched on.
    pub fn all(registry: &AttributeRegistry) -> Self {
        Self::with_default(registry, true)
    }

    fn with_default(registry: &AttributeRegistry, on: bool) -> Self {
        Self {
            flags: registry
                .display_names()
                .map(|name| (name.to_string(), on))
                .collect(),
        }
    }

    /// Switches `name` on or off. Matching is case-insensitive.
    pub fn set(&mut self, name: &str, on: bool) -> CoreResult<()> {
        *self.flag_mut(name)? = on;
        Ok(())
    }

    /// Flips `name` and returns the new value.
    pub fn toggle(&mut self, name: &str) -> CoreResult<bool> {
        let flag = self.flag_mut(name)?;
        *flag = !*flag;
        Ok(*flag)
    }

    /// Switches every attribute to `on`.
    pub fn set_all(&mut self, on: bool) {
        self.flags.values_mut().for_each(|flag| *flag = on);
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.position(name)
            .and_then(|idx| self.flags.get_index(idx))
            .is_some_and(|(_, on)| *on)
    }

    /// Display names currently switched on, in registry order.
    pub fn active(&self) -> impl Iterator<Item = &str> {
        self.flags
            .iter()
            .filter(|(_, on)| **on)
            .map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(name, on)| (name.as_str(), *on))
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.flags.get_index_of(name).or_else(|| {
            let key = canonical_key(name);
            self.flags.keys().position(|k| canonical_key(k) == key)
        })
    }

    fn flag_mut(&mut self, name: &str) -> CoreResult<&mut bool> {
        let idx = self
            .position(name)
            .ok_or_else(|| CoreError::UnknownAttribute(name.to_string()))?;
        self.flags
            .get_index_mut(idx)
            .map(|(_, flag)| flag)
            .ok_or_else(|| CoreError::UnknownAttribute(name.to_string()))
    }
}
