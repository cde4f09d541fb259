//! Store Module
//!
//! Transactional namespace/key-value contract used by the importer and the
//! query session, with a durable file backend and an in-memory backend.
//!
//! ## Responsibilities
//! - Group keys into named namespaces (one per block)
//! - Stage writes in a transaction and publish them atomically on commit
//! - Serve reads from a stable snapshot in natural (byte-wise) key order
//!
//! ## Transaction Model
//! ```text
//!   begin_write ──► WriteTransaction ──► commit ──► Store::persist
//!        │            (private copy)       │
//!        │                                 └─ abort / drop: copy discarded
//!        │
//!   begin_read ───► ReadTransaction (borrows the committed snapshot)
//! ```
//!
//! A store hands out at most one write transaction at a time (`&mut self`),
//! and a read transaction borrows the store, so neither can observe a
//! half-applied commit.

mod namespace;
mod transaction;
mod format;
mod file;
mod memory;

pub use namespace::{Namespace, Namespaces};
pub use transaction::{ReadTransaction, WriteTransaction};
pub use file::{Database, OpenMode};
pub use memory::MemoryStore;

use crate::error::{CountDbError, Result};

/// A durable (or fake) home for committed namespaces
pub trait Store {
    /// The last committed contents
    fn committed(&self) -> &Namespaces;

    /// Atomically replace the committed contents
    ///
    /// Either every namespace in `namespaces` becomes visible or the
    /// previous contents are kept untouched.
    fn persist(&mut self, namespaces: Namespaces) -> Result<()>;

    /// Whether this handle accepts write transactions
    fn is_writable(&self) -> bool;

    /// Begin the (single) write transaction
    ///
    /// The transaction starts from a private copy of the committed contents.
    fn begin_write(&mut self) -> Result<WriteTransaction<'_, Self>>
    where
        Self: Sized,
    {
        if !self.is_writable() {
            return Err(CountDbError::ReadOnly);
        }
        let base = self.committed().clone();
        Ok(WriteTransaction::new(self, base))
    }

    /// Begin a read-only transaction over the committed snapshot
    fn begin_read(&self) -> Result<ReadTransaction<'_>> {
        Ok(ReadTransaction::new(self.committed()))
    }
}
