//! Query Module
//!
//! Interactive, read-only session over one database snapshot.
//!
//! ## Session States
//! ```text
//!   Open ──► Prompt ──► Dispatch ──┬─► Prompt   (lookup / hit / miss / ignored)
//!                                  └─► Closed   (quit, q, exit, end of input, interrupt)
//! ```

mod input;

pub use input::{InputEvent, InterruptibleInput, LineInput, SessionInput};

use std::io::Write;
use std::path::Path;

use crate::config::Config;
use crate::error::{CountDbError, Result};
use crate::store::{Database, OpenMode, ReadTransaction, Store};

/// Words that end the session
pub const EXIT_WORDS: [&str; 3] = ["quit", "q", "exit"];

/// One parsed line of interactive input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// `quit`, `q` or `exit`
    Quit,

    /// Any other single bare word: a block name
    Lookup(&'a str),

    /// Empty input, several tokens or disallowed characters
    Ignore,
}

impl<'a> Command<'a> {
    /// Parse a line of input
    pub fn parse(input: &'a str) -> Self {
        let word = input.trim();

        if word.is_empty() || !word.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Command::Ignore;
        }

        if EXIT_WORDS.contains(&word) {
            Command::Quit
        } else {
            Command::Lookup(word)
        }
    }
}

/// Counters for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryStats {
    /// Lookups answered with entries
    pub hits: usize,

    /// Lookups for blocks that do not exist
    pub misses: usize,
}

/// A running query session
pub struct QuerySession<'t, I, W> {
    /// Snapshot held for the whole session
    txn: ReadTransaction<'t>,
    input: I,
    output: W,
    prompt: String,
    stats: QueryStats,
}

impl<'t, I: SessionInput, W: Write> QuerySession<'t, I, W> {
    /// Create a session over an open read transaction
    pub fn new(txn: ReadTransaction<'t>, input: I, output: W, config: &Config) -> Self {
        Self {
            txn,
            input,
            output,
            prompt: config.prompt.clone(),
            stats: QueryStats::default(),
        }
    }

    /// Prompt and dispatch until an exit word, end of input or interrupt
    pub fn run(mut self) -> Result<QueryStats> {
        loop {
            self.output.write_all(self.prompt.as_bytes())?;
            self.output.flush()?;

            let line = match self.input.next_event()? {
                InputEvent::Line(line) => line,
                InputEvent::End => {
                    tracing::debug!("end of input, closing session");
                    break;
                }
                InputEvent::Interrupt => {
                    tracing::debug!("interrupted, closing session");
                    writeln!(self.output)?;
                    break;
                }
            };

            match Command::parse(&line) {
                Command::Quit => break,
                Command::Lookup(block) => self.lookup(block)?,
                Command::Ignore => {}
            }
        }

        self.output.flush()?;
        Ok(self.stats)
    }

    /// Print every entry of `block`, or a miss message
    fn lookup(&mut self, block: &str) -> Result<()> {
        match self.txn.namespace(block) {
            None => {
                self.stats.misses += 1;
                writeln!(self.output, "block \"{}\" does not exist", block)?;
            }
            Some(ns) => {
                self.stats.hits += 1;
                for (device, count) in ns.iter() {
                    writeln!(
                        self.output,
                        "{}: {}",
                        String::from_utf8_lossy(device),
                        String::from_utf8_lossy(count)
                    )?;
                }
            }
        }
        Ok(())
    }
}

/// Run an interactive session against the database at `path`
///
/// The database is opened read-only and closed on every path. Errors are
/// wrapped with the database path.
pub fn run_query<I: SessionInput, W: Write>(
    path: &Path,
    input: I,
    output: W,
    config: &Config,
) -> Result<QueryStats> {
    let wrap = |e: CountDbError| CountDbError::Query {
        path: path.to_path_buf(),
        source: Box::new(e),
    };

    let db = Database::open_with(path, OpenMode::ReadOnly, config).map_err(wrap)?;

    tracing::info!(path = %path.display(), "query session started");

    let result = db
        .begin_read()
        .and_then(|txn| QuerySession::new(txn, input, output, config).run());
    let closed = db.close();

    let stats = result.map_err(wrap)?;
    closed.map_err(wrap)?;

    tracing::info!(hits = stats.hits, misses = stats.misses, "query session closed");
    Ok(stats)
}
