//! Per-graph name dictionary
//!
//! Compact replies carry labels, relationship types and property keys as
//! positions in server-side catalogs. `Dictionary` caches those catalogs for
//! one graph handle. Each table is replaced wholesale on refresh; lookups
//! never fail and degrade to `label_<i>`, `type_<i>` or `prop_<i>` when the
//! cache does not (yet) know an index.

use std::sync::{PoisonError, RwLock, RwLockReadGuard};
use tracing::debug;

/// Snapshot of the three catalogs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTables {
    labels: Vec<String>,
    relationship_types: Vec<String>,
    property_keys: Vec<String>,
}

impl NameTables {
    pub fn new(labels: Vec<String>, relationship_types: Vec<String>, property_keys: Vec<String>) -> Self {
        Self {
            labels,
            relationship_types,
            property_keys,
        }
    }

    /// Bounds-checked label lookup
    pub fn label(&self, index: i64) -> Option<&str> {
        lookup(&self.labels, index)
    }

    /// Bounds-checked relationship type lookup
    pub fn relationship_type(&self, index: i64) -> Option<&str> {
        lookup(&self.relationship_types, index)
    }

    /// Bounds-checked property key lookup
    pub fn property_key(&self, index: i64) -> Option<&str> {
        lookup(&self.property_keys, index)
    }

    pub fn resolve_label(&self, index: i64) -> String {
        self.label(index)
            .map(str::to_string)
            .unwrap_or_else(|| format!("label_{}", index))
    }

    pub fn resolve_relationship_type(&self, index: i64) -> String {
        self.relationship_type(index)
            .map(str::to_string)
            .unwrap_or_else(|| format!("type_{}", index))
    }

    pub fn resolve_property_key(&self, index: i64) -> String {
        self.property_key(index)
            .map(str::to_string)
            .unwrap_or_else(|| format!("prop_{}", index))
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn relationship_types(&self) -> &[String] {
        &self.relationship_types
    }

    pub fn property_keys(&self) -> &[String] {
        &self.property_keys
    }
}

fn lookup(table: &[String], index: i64) -> Option<&str> {
    usize::try_from(index)
        .ok()
        .and_then(|i| table.get(i))
        .map(String::as_str)
}

/// Name dictionary owned by a single graph handle
///
/// Refresh takes the write lock only for the swap; decoding a reply holds
/// the read lock for the whole reply so every cell sees the same snapshot.
#[derive(Debug, Default)]
pub struct Dictionary {
    tables: RwLock<NameTables>,
}

impl Dictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every table that was supplied; `None` leaves a table as it is
    pub fn refresh(
        &self,
        labels: Option<Vec<String>>,
        relationship_types: Option<Vec<String>>,
        property_keys: Option<Vec<String>>,
    ) {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(labels) = labels {
            debug!("Dictionary: {} labels", labels.len());
            tables.labels = labels;
        }
        if let Some(types) = relationship_types {
            debug!("Dictionary: {} relationship types", types.len());
            tables.relationship_types = types;
        }
        if let Some(keys) = property_keys {
            debug!("Dictionary: {} property keys", keys.len());
            tables.property_keys = keys;
        }
    }

    /// Shared-lock snapshot for decoding
    pub fn read(&self) -> RwLockReadGuard<'_, NameTables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn resolve_label(&self, index: i64) -> String {
        self.read().resolve_label(index)
    }

    pub fn resolve_relationship_type(&self, index: i64) -> String {
        self.read().resolve_relationship_type(index)
    }

    pub fn resolve_property_key(&self, index: i64) -> String {
        self.read().resolve_property_key(index)
    }
}
