//! Catapult CLI - index the host and query it from a terminal.
//!
//! Logs go to `<data dir>/catapult/logs/catapult.jsonl` and stderr; results go
//! to stdout.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use catapult::actions::WebSearchAction;
use catapult::config::ConfigCodec;
use catapult::{logging, IndexStore, IndexableItem, StoreOptions};

#[derive(Parser, Debug)]
#[command(name = "catapult")]
#[command(about = "Fuzzy search over local applications, bookmarks and actions")]
struct Args {
    /// Directory holding config.json and index.json
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory for the JSONL log file
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Index everything and print ranked matches for a query
    Search {
        query: String,

        /// Show at most this many results
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
    /// Make `target` the preferred result for `query`
    Boost { query: String, target: String },
    /// Print the data files and the configured extra roots
    Paths,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_dir = args.log_dir.unwrap_or_else(logging::default_log_dir);
    let _guard = logging::init(&log_dir);

    let data_dir = args.data_dir.unwrap_or_else(ConfigCodec::default_dir);
    info!(data_dir = %data_dir.display(), command = ?args.command, "Catapult starting");

    match args.command {
        Command::Search { query, limit } => {
            let mut options = StoreOptions::for_host(&data_dir);
            options.matcher.max_results = Some(limit);
            let store = IndexStore::new(options);

            store
                .index_action(IndexableItem::action(Arc::new(WebSearchAction::wikipedia())))
                .context("Failed to register built-in actions")?;
            let report = store.start().context("Failed to start index store")?;
            info!(items = report.item_count(), total_ms = report.total_ms, "Indexed");

            for result in store.search(&query) {
                let details = result.target.details().unwrap_or_default();
                println!("{:>8.2}  {}  {}", result.score, result.name, details);
            }
        }
        Command::Boost { query, target } => {
            let store = IndexStore::new(StoreOptions::new(&data_dir));
            store.start().context("Failed to load persisted state")?;
            store
                .add_boost(&query, &target)
                .with_context(|| format!("Failed to save boost for '{}'", query))?;
            println!("Boosted '{}' -> {}", query, target);
        }
        Command::Paths => {
            let codec = ConfigCodec::new(&data_dir);
            println!("config: {}", codec.config_path().display());
            println!("index:  {}", codec.index_path().display());
            for path in codec.load_user_config().value.normalized().expanded_paths() {
                println!("root:   {}", path.display());
            }
        }
    }

    Ok(())
}
