//! Namespaces
//!
//! Ordered maps that make up a store's contents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One named group of keys, iterated in byte-wise key order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl Namespace {
    /// Create an empty namespace
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by key
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.entries.get(key).map(|v| v.as_slice())
    }

    /// Insert or overwrite a key, returning the previous value
    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) -> Option<Vec<u8>> {
        self.entries.insert(key, value)
    }

    /// All entries in natural key order
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> + '_ {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the namespace holds no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The full contents of a store: namespace name → namespace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespaces {
    namespaces: BTreeMap<String, Namespace>,
}

impl Namespaces {
    /// Create an empty set of namespaces
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a namespace by name
    pub fn get(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.get(name)
    }

    /// Look up a namespace for writing
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Namespace> {
        self.namespaces.get_mut(name)
    }

    /// Create the namespace if absent; returns `true` if it was created
    pub fn create(&mut self, name: &str) -> bool {
        if self.namespaces.contains_key(name) {
            return false;
        }
        self.namespaces.insert(name.to_string(), Namespace::new());
        true
    }

    /// Namespace names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.namespaces.keys().map(|k| k.as_str())
    }

    /// Number of namespaces
    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    /// Whether there are no namespaces
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// Total number of keys across all namespaces
    pub fn entry_count(&self) -> usize {
        self.namespaces.values().map(Namespace::len).sum()
    }
}
