//! In-memory store
//!
//! Same transactional contract as [`Database`](super::Database) without any
//! file I/O. Used in tests and benchmarks.

use crate::error::{CountDbError, Result};

use super::{Namespaces, Store};

/// A store whose committed contents live only in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    committed: Namespaces,
    writable: bool,
    fail_commits: bool,
    commits: usize,
}

impl MemoryStore {
    /// Create an empty, writable store
    pub fn new() -> Self {
        Self {
            writable: true,
            ..Self::default()
        }
    }

    /// Create a writable store with existing contents
    pub fn with_contents(committed: Namespaces) -> Self {
        Self {
            committed,
            writable: true,
            ..Self::default()
        }
    }

    /// Create a store that rejects write transactions
    pub fn read_only(committed: Namespaces) -> Self {
        Self {
            committed,
            ..Self::default()
        }
    }

    /// Create a writable store whose every commit fails
    pub fn failing_commits() -> Self {
        Self {
            writable: true,
            fail_commits: true,
            ..Self::default()
        }
    }

    /// Number of successful commits
    pub fn commit_count(&self) -> usize {
        self.commits
    }
}

impl Store for MemoryStore {
    fn committed(&self) -> &Namespaces {
        &self.committed
    }

    fn persist(&mut self, namespaces: Namespaces) -> Result<()> {
        if !self.writable {
            return Err(CountDbError::ReadOnly);
        }
        if self.fail_commits {
            return Err(CountDbError::Transaction("simulated commit failure".to_string()));
        }
        self.committed = namespaces;
        self.commits += 1;
        Ok(())
    }

    fn is_writable(&self) -> bool {
        self.writable
    }
}
