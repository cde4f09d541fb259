//! CountDB Binary
//!
//! Imports a count file into a new database, or opens an interactive
//! query session on an existing one.

use clap::Parser;
use countdb::cli::{execute, Args};
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    // Logs go to stderr so the interactive session owns stdout
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,countdb=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mode = match args.mode() {
        Ok(mode) => mode,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", countdb::cli::USAGE);
            std::process::exit(1);
        }
    };

    tracing::debug!("cnt2db v{} mode={:?}", countdb::VERSION, mode);

    if let Err(e) = execute(&mode, &args.config()) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
