//! Import Module
//!
//! Drives one pass over a count file and writes its blocks into a store.
//!
//! ## Responsibilities
//! - Classify every line and track the current block
//! - Create (or reopen) one namespace per block header
//! - Write each count entry into the current block (last write wins)
//! - Commit once at end of input, or abort so nothing is published

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::{Config, OrphanPolicy};
use crate::error::{CountDbError, Result};
use crate::parser::{Line, LineClassifier};
use crate::store::{Database, OpenMode, Store};

/// Counters for one import pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Lines read from the source
    pub lines: usize,

    /// Namespaces created (reopened headers are not counted)
    pub blocks: usize,

    /// Count entries written, overwrites included
    pub entries: usize,

    /// Unrecognized lines and skipped orphan entries
    pub skipped: usize,
}

/// Count file importer
#[derive(Debug, Clone)]
pub struct Importer {
    classifier: LineClassifier,
    orphan_entries: OrphanPolicy,
}

impl Importer {
    /// Create an importer from the config
    pub fn new(config: &Config) -> Self {
        Self {
            classifier: LineClassifier::new(config.comment_marker),
            orphan_entries: config.orphan_entries,
        }
    }

    /// Import every line of `source` into `store` within one write transaction
    ///
    /// Steps:
    /// 1. Begin the write transaction
    /// 2. For each line: classify, update the current block, write entries
    /// 3. Commit at end of input
    ///
    /// Any error (read failure, orphan entry under `OrphanPolicy::Fail`,
    /// store failure) drops the transaction, so the store keeps its previous
    /// contents.
    pub fn run<R: BufRead, S: Store>(&self, mut source: R, store: &mut S) -> Result<ImportStats> {
        let mut txn = store.begin_write()?;
        let mut stats = ImportStats::default();

        // Namespace receiving count entries; None until the first header
        let mut current: Option<String> = None;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let line_no = stats.lines + 1;

            match source.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    txn.abort();
                    return Err(CountDbError::Read {
                        line: line_no,
                        source: e,
                    });
                }
            }
            stats.lines = line_no;

            let text = String::from_utf8_lossy(&buf);
            let text = text.trim_end_matches(['\n', '\r']);

            match self.classifier.classify(text) {
                Line::Ignorable => {}

                Line::BlockHeader { name } => {
                    if txn.create_namespace(name) {
                        stats.blocks += 1;
                        tracing::debug!(block = name, line = line_no, "block created");
                    } else {
                        tracing::debug!(block = name, line = line_no, "block reopened");
                    }
                    current = Some(name.to_string());
                }

                Line::Entry { device, count } => match current.as_deref() {
                    Some(block) => {
                        txn.put(block, device.as_bytes(), count.as_bytes())?;
                        stats.entries += 1;
                    }
                    None => match self.orphan_entries {
                        OrphanPolicy::Fail => {
                            txn.abort();
                            return Err(CountDbError::Structural {
                                line: line_no,
                                content: text.to_string(),
                            });
                        }
                        OrphanPolicy::Skip => {
                            tracing::warn!(
                                line = line_no,
                                content = text,
                                "count entry before any block header, skipped"
                            );
                            stats.skipped += 1;
                        }
                    },
                },

                Line::Unrecognized => {
                    tracing::trace!(line = line_no, content = text, "unrecognized line skipped");
                    stats.skipped += 1;
                }
            }
        }

        txn.commit()?;
        Ok(stats)
    }
}

/// Import the count file at `source` into a new database at `target`
///
/// The target is opened in [`OpenMode::Create`], so an existing database is
/// replaced only once the whole file has been imported. The database handle
/// is closed on every path. Errors are wrapped with both paths.
pub fn import_file(source: &Path, target: &Path, config: &Config) -> Result<ImportStats> {
    let wrap = |e: CountDbError| CountDbError::Import {
        source_file: source.to_path_buf(),
        target: target.to_path_buf(),
        source: Box::new(e),
    };

    let file = File::open(source).map_err(|e| {
        wrap(CountDbError::Open {
            path: source.to_path_buf(),
            source: e,
        })
    })?;

    let mut db = Database::open_with(target, OpenMode::Create, config).map_err(wrap)?;

    tracing::info!(
        source = %source.display(),
        target = %target.display(),
        "import started"
    );

    let result = Importer::new(config).run(BufReader::new(file), &mut db);
    let closed = db.close();

    let stats = result.map_err(wrap)?;
    closed.map_err(wrap)?;

    tracing::info!(
        lines = stats.lines,
        blocks = stats.blocks,
        entries = stats.entries,
        skipped = stats.skipped,
        "import committed"
    );

    Ok(stats)
}
