//! Error types for CountDB
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using CountDbError
pub type Result<T> = std::result::Result<T, CountDbError>;

/// Unified error type for CountDB operations
#[derive(Debug, Error)]
pub enum CountDbError {
    // -------------------------------------------------------------------------
    // Invocation Errors
    // -------------------------------------------------------------------------
    #[error("Usage error: {0}")]
    Usage(String),

    // -------------------------------------------------------------------------
    // Open Errors
    // -------------------------------------------------------------------------
    #[error("Cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Database {} is locked by another writer", .path.display())]
    Locked { path: PathBuf },

    #[error("Database {} is corrupt: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    // -------------------------------------------------------------------------
    // Import Errors
    // -------------------------------------------------------------------------
    #[error("Line {line}: count entry before any block header: {content:?}")]
    Structural { line: usize, content: String },

    #[error("Read failed at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Importing {} into {}: {source}", .source_file.display(), .target.display())]
    Import {
        source_file: PathBuf,
        target: PathBuf,
        #[source]
        source: Box<CountDbError>,
    },

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Transaction failed: {0}")]
    Transaction(String),

    #[error("Database was opened read-only")]
    ReadOnly,

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Query Errors
    // -------------------------------------------------------------------------
    #[error("Query session on {}: {source}", .path.display())]
    Query {
        path: PathBuf,
        #[source]
        source: Box<CountDbError>,
    },

    #[error("Signal handler error: {0}")]
    Signal(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
