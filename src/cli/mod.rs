//! Command-line interface: one store operation per invocation, plus
//! `serve` to boot the HTTP surfaces.

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{run, run_command};
pub use errors::{CliError, CliResult};
