//! CLI argument definitions using clap.
//!
//! Commands:
//! - veildb create <collection> [schema] [json]
//! - veildb insert <collection> <json> [schema]
//! - veildb read <collection> [schema]
//! - veildb edit <collection> <id> <json> [schema]
//! - veildb remove <collection> <id> [schema]
//! - veildb drop <collection> [schema]
//! - veildb list [schema]
//! - veildb serve --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;

/// veildb - a minimal encrypted-at-rest document store
#[derive(Parser, Debug)]
#[command(name = "veildb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Root directory holding schemas and collections
    #[arg(long, global = true, default_value = "./db")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a collection, optionally seeded with one record
    Create {
        collection: String,
        /// Schema name; empty means the store root
        #[arg(default_value = "")]
        schema: String,
        /// Initial record as a JSON object
        data: Option<String>,
    },

    /// Insert a record (creates the collection on first insert)
    Insert {
        collection: String,
        /// Record as a JSON object
        data: String,
        #[arg(default_value = "")]
        schema: String,
    },

    /// Print all records of a collection
    Read {
        collection: String,
        #[arg(default_value = "")]
        schema: String,
    },

    /// Replace a record's fields by _id
    Edit {
        collection: String,
        id: String,
        /// Replacement fields as a JSON object
        data: String,
        #[arg(default_value = "")]
        schema: String,
    },

    /// Remove a record by _id
    Remove {
        collection: String,
        id: String,
        #[arg(default_value = "")]
        schema: String,
    },

    /// Drop a collection (data and key file)
    Drop {
        collection: String,
        #[arg(default_value = "")]
        schema: String,
    },

    /// List collections in a schema
    List {
        #[arg(default_value = "")]
        schema: String,
    },

    /// Start the REST API and web portal
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
