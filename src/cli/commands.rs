//! CLI command implementations.
//!
//! Every command constructs a [`CollectionStore`] over `--root`, runs one
//! store operation and prints the outcome. `serve` additionally loads the
//! process config (writing defaults on first run), prepares the default
//! schema and hands off to the HTTP server.

use std::path::Path;

use crate::config::Config;
use crate::http::HttpServer;
use crate::store::CollectionStore;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Main CLI entry point; the only function main.rs calls.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let store = CollectionStore::new(&cli.root);
    run_command(&store, cli.command)
}

/// Dispatch one parsed command against a store.
pub fn run_command(store: &CollectionStore, cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Create {
            collection,
            schema,
            data,
        } => {
            store.create(&schema, &collection, data.as_deref())?;
            println!(
                "Created collection {} at {}",
                collection,
                store.layout().data_path(&schema, &collection).display()
            );
            Ok(())
        }

        Command::Insert {
            collection,
            data,
            schema,
        } => {
            store.insert(&schema, &collection, &data)?;
            println!("Inserted record into collection {}", collection);
            Ok(())
        }

        Command::Read { collection, schema } => {
            let records = store.load(&schema, &collection)?;
            let pretty = serde_json::to_string_pretty(&records)?;
            println!("Collection {} contents:\n{}", collection, pretty);
            Ok(())
        }

        Command::Edit {
            collection,
            id,
            data,
            schema,
        } => {
            store.update(&schema, &collection, &id, &data)?;
            println!("Updated record {} in collection {}", id, collection);
            Ok(())
        }

        Command::Remove {
            collection,
            id,
            schema,
        } => {
            store.delete(&schema, &collection, &id)?;
            println!("Removed record {} from collection {}", id, collection);
            Ok(())
        }

        Command::Drop { collection, schema } => {
            store.drop_collection(&schema, &collection)?;
            println!("Dropped collection {}", collection);
            Ok(())
        }

        Command::List { schema } => {
            for name in store.list(&schema)? {
                println!("{}", name);
            }
            Ok(())
        }

        Command::Serve { config } => serve(store, &config),
    }
}

/// Boot config, ensure the default schema exists, run the server.
fn serve(store: &CollectionStore, config_path: &Path) -> CliResult<()> {
    let config = Config::load_or_init(config_path)?;
    config.validate()?;

    store.layout().ensure_schema(&config.schema_name)?;

    let root = store.layout().root().to_path_buf();
    let runtime = tokio::runtime::Runtime::new().map_err(CliError::Server)?;
    runtime
        .block_on(HttpServer::new(config, root).start())
        .map_err(CliError::Server)
}
