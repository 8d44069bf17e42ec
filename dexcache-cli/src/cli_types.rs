//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dexcache")]
#[command(about = "Local read-through cache of the creature catalog", long_about = None)]
pub(crate) struct Cli {
    /// Catalog database path (overrides DEXCACHE_DB and the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Upstream API root (overrides DEXCACHE_UPSTREAM_URL and the config file)
    #[arg(long, global = true)]
    pub upstream: Option<String>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List entries, importing from upstream first if the store is empty
    List(ListArgs),

    /// Show one entry, fetching it from upstream if it is not stored yet
    Show {
        /// Entry id
        id: i64,

        /// Print the entry as JSON
        #[arg(long)]
        json: bool,
    },

    /// Toggle the favorite flag of an entry
    Favorite {
        /// Entry id
        id: i64,

        /// Print the new state as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all known type names
    Types {
        /// Print the names as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Import entries from upstream into the store
    Sync(SyncArgs),

    /// Show store statistics and recent imports
    Stats,

    /// Inspect settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Clone)]
pub(crate) struct ListArgs {
    /// Only entries whose name contains this text (case-insensitive)
    #[arg(long)]
    pub name: Option<String>,

    /// Only entries with this type (case-insensitive)
    #[arg(long = "type")]
    pub type_name: Option<String>,

    /// Only favorite entries
    #[arg(long)]
    pub favorites: bool,

    /// Page number, starting at 1
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,

    /// Entries per page (defaults to the configured page size)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Print the page as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub(crate) struct SyncArgs {
    /// Number of entries to request from upstream
    #[arg(short, long)]
    pub limit: Option<u32>,

    /// Maximum concurrent entry fetches
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// What to do when one entry fails: abort or skip
    #[arg(long)]
    pub on_error: Option<dexcache_sync::FailurePolicy>,
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show resolved settings and their sources
    Show,

    /// Print the config file path
    Path,
}
