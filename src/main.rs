//! veildb CLI entry point.
//!
//! Parses arguments, dispatches to CLI commands, prints errors to stderr
//! and exits non-zero on failure. All logic lives in the cli module.

use veildb::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
