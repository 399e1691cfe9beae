//! ippi: assemble, check and run IPPcode24 programs.
//!
//! Programs are read as IPPcode24 source or, when the file starts with `<`,
//! as the XML program representation.
//!
//! Exit codes:
//! - 0: Success (or the code passed to EXIT, 0-9)
//! - 10: Invalid command-line arguments
//! - 11: Source or input file cannot be read
//! - 12: Output cannot be written
//! - 21-23: Source text errors (header, opcode, syntax)
//! - 31: Malformed XML program
//! - 32, 52-58: Structural and runtime errors

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "IPPI_LOG";

#[derive(Parser)]
#[command(name = "ippi", version)]
#[command(about = "IPPcode24 interpreter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble and execute a program
    Run {
        /// Program file (source or XML)
        source: PathBuf,
        /// Read program input from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Assemble and validate a program without running it
    Check {
        /// Program file (source or XML)
        source: PathBuf,
    },
    /// Print a program in canonical form
    Fmt {
        /// Program file (source or XML)
        source: PathBuf,
    },
}

fn main() {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 10 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    let result = match &cli.command {
        Command::Run { source, input } => commands::run(source, input.as_deref()),
        Command::Check { source } => commands::check(source),
        Command::Fmt { source } => commands::fmt(source),
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

/// Log to stderr, `warn` and above unless `IPPI_LOG` says otherwise.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
