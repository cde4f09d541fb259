//! Transactions
//!
//! Write transactions stage changes on a private copy; read transactions
//! borrow the committed snapshot.

use crate::error::{CountDbError, Result};

use super::{Namespace, Namespaces, Store};

/// The single writable transaction of a store
///
/// Dropping it without calling [`commit`](Self::commit) discards every
/// staged change.
pub struct WriteTransaction<'a, S: Store> {
    /// Store that receives the staged contents on commit
    store: &'a mut S,

    /// Private copy being modified
    pending: Namespaces,

    /// Set once committed or explicitly aborted
    finished: bool,
}

impl<'a, S: Store> WriteTransaction<'a, S> {
    pub(super) fn new(store: &'a mut S, base: Namespaces) -> Self {
        tracing::debug!(namespaces = base.len(), "write transaction started");
        Self {
            store,
            pending: base,
            finished: false,
        }
    }

    /// Create the namespace if it does not exist yet
    ///
    /// Returns `true` when the namespace was newly created and `false` when
    /// an existing one was reopened.
    pub fn create_namespace(&mut self, name: &str) -> bool {
        self.pending.create(name)
    }

    /// Look up a namespace as seen by this transaction
    pub fn namespace(&self, name: &str) -> Option<&Namespace> {
        self.pending.get(name)
    }

    /// Write `key = value` into an existing namespace (last write wins)
    pub fn put(&mut self, namespace: &str, key: &[u8], value: &[u8]) -> Result<()> {
        let ns = self.pending.get_mut(namespace).ok_or_else(|| {
            CountDbError::Transaction(format!("namespace {:?} does not exist", namespace))
        })?;
        ns.put(key.to_vec(), value.to_vec());
        Ok(())
    }

    /// Publish all staged changes atomically
    pub fn commit(mut self) -> Result<()> {
        self.finished = true;
        let pending = std::mem::take(&mut self.pending);
        let namespaces = pending.len();
        let entries = pending.entry_count();

        self.store.persist(pending)?;

        tracing::debug!(namespaces, entries, "write transaction committed");
        Ok(())
    }

    /// Discard all staged changes
    pub fn abort(mut self) {
        self.finished = true;
        tracing::debug!("write transaction aborted");
    }
}

impl<S: Store> Drop for WriteTransaction<'_, S> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!("write transaction dropped without commit, changes discarded");
        }
    }
}

/// A read-only view of one committed snapshot
#[derive(Debug, Clone, Copy)]
pub struct ReadTransaction<'a> {
    snapshot: &'a Namespaces,
}

impl<'a> ReadTransaction<'a> {
    pub(super) fn new(snapshot: &'a Namespaces) -> Self {
        Self { snapshot }
    }

    /// Look up a namespace by name
    pub fn namespace(&self, name: &str) -> Option<&'a Namespace> {
        self.snapshot.get(name)
    }

    /// All namespace names in sorted order
    pub fn namespace_names(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.snapshot.names()
    }
}
