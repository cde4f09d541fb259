//! Command-line surface
//!
//! Flag definitions and mode validation for the `cnt2db` binary.

use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, OrphanPolicy};
use crate::error::{CountDbError, Result};
use crate::import::import_file;
use crate::query::{run_query, InterruptibleInput};

/// One-line usage shown when no mode is selected
pub const USAGE: &str =
    "Usage: cnt2db -i <database> or cnt2db --cf <countFile> --wdb <new database>";

/// CountDB command line
#[derive(Parser, Debug, Default)]
#[command(name = "cnt2db")]
#[command(about = "Import block count files into a database and query them interactively")]
#[command(version)]
pub struct Args {
    /// Database for interactive queries
    #[arg(short = 'i', long = "interactive", value_name = "DATABASE")]
    pub interactive: Option<PathBuf>,

    /// New database populated with the count file data
    #[arg(long = "wdb", value_name = "DATABASE")]
    pub write_db: Option<PathBuf>,

    /// Count file to parse and store in a new database
    #[arg(long = "cf", value_name = "COUNT_FILE")]
    pub count_file: Option<PathBuf>,

    /// Skip count entries that appear before any block header instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Prompt shown in interactive mode
    #[arg(long, value_name = "TEXT")]
    pub prompt: Option<String>,
}

/// The validated mode of operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Query an existing database
    Interactive { database: PathBuf },

    /// Build a new database from a count file
    Import { count_file: PathBuf, database: PathBuf },

    /// Nothing requested: print usage
    Usage,
}

impl Args {
    /// Validate the flag combination
    ///
    /// Interactive and import flags are mutually exclusive, and the two
    /// import flags must be given together.
    pub fn mode(&self) -> Result<Mode> {
        if self.interactive.is_some() && (self.write_db.is_some() || self.count_file.is_some()) {
            return Err(CountDbError::Usage(
                "--wdb and --cf may not be specified in interactive mode".to_string(),
            ));
        }

        match (&self.interactive, &self.count_file, &self.write_db) {
            (Some(database), None, None) => Ok(Mode::Interactive {
                database: database.clone(),
            }),
            (None, Some(count_file), Some(database)) => Ok(Mode::Import {
                count_file: count_file.clone(),
                database: database.clone(),
            }),
            (None, None, None) => Ok(Mode::Usage),
            _ => Err(CountDbError::Usage(
                "--wdb and --cf must be specified together".to_string(),
            )),
        }
    }

    /// Build the runtime config from the flags
    pub fn config(&self) -> Config {
        let mut builder = Config::builder();
        if self.lenient {
            builder = builder.orphan_entries(OrphanPolicy::Skip);
        }
        if let Some(prompt) = &self.prompt {
            builder = builder.prompt(prompt.clone());
        }
        builder.build()
    }
}

/// Execute a validated mode against the process's stdin/stdout
pub fn execute(mode: &Mode, config: &Config) -> Result<()> {
    match mode {
        Mode::Interactive { database } => {
            let (interrupt_tx, interrupts) = crossbeam::channel::bounded(1);
            ctrlc::set_handler(move || {
                let _ = interrupt_tx.try_send(());
            })
            .map_err(|e| CountDbError::Signal(e.to_string()))?;

            let input = InterruptibleInput::spawn(BufReader::new(io::stdin()), interrupts);
            let stdout = io::stdout();
            run_query(database, input, stdout.lock(), config)?;
        }
        Mode::Import {
            count_file,
            database,
        } => {
            import_file(count_file, database, config)?;
        }
        Mode::Usage => {
            let mut stdout = io::stdout();
            writeln!(stdout, "{}", USAGE)?;
        }
    }
    Ok(())
}
