//! # CountDB
//!
//! Turns block/device count files into an embedded key-value database:
//! - Line-oriented parser tolerant of comments, blank and stray lines
//! - One namespace per block, one key per device
//! - Whole-file import committed in a single atomic transaction
//! - Interactive read-only query session over one consistent snapshot
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────┐          ┌──────────────┐
//! │  Count File  │          │    stdin     │
//! └──────┬───────┘          └──────┬───────┘
//!        │ lines                   │ words
//!        ▼                         ▼
//! ┌──────────────┐          ┌──────────────┐
//! │   Importer   │          │ QuerySession │
//! │ (classifier) │          │  (read txn)  │
//! └──────┬───────┘          └──────┬───────┘
//!        │ write txn               │ snapshot
//!        └────────────┬────────────┘
//!                     ▼
//!              ┌─────────────┐
//!              │    Store    │
//!              │ (namespaces)│
//!              └──────┬──────┘
//!                     ▼
//!              ┌─────────────┐
//!              │  Database   │
//!              │   (file)    │
//!              └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod parser;
pub mod store;
pub mod import;
pub mod query;
pub mod cli;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CountDbError, Result};
pub use config::{Config, OrphanPolicy};
pub use import::{import_file, ImportStats, Importer};
pub use query::{run_query, InterruptibleInput, LineInput, QuerySession};
pub use store::{Database, MemoryStore, OpenMode, Store};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of CountDB
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
