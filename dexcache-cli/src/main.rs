//! dexcache CLI
//!
//! Command-line front end for the local creature catalog cache.

mod cli_types;
mod commands;
mod error;
mod progress_bar;

use std::io::Write;

use clap::Parser;
use log::LevelFilter;

use cli_types::{Cli, Commands, ConfigAction};
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Commands::Config { action } = &cli.command {
        return match action {
            ConfigAction::Show => commands::config::run_config_show(),
            ConfigAction::Path => commands::config::run_config_path(),
        };
    }

    let app = commands::AppContext::load(cli.db, cli.upstream, cli.quiet)?;

    match cli.command {
        Commands::List(args) => commands::list::run_list(&app, args),
        Commands::Show { id, json } => commands::show::run_show(&app, id, json),
        Commands::Favorite { id, json } => commands::favorite::run_favorite(&app, id, json),
        Commands::Types { json } => commands::types::run_types(&app, json),
        Commands::Sync(args) => commands::sync::run_sync(&app, args),
        Commands::Stats => commands::stats::run_stats(&app),
        Commands::Config { .. } => Ok(()),
    }
}

/// Plain messages by default; `--verbose` adds timestamps, levels and
/// debug output, `--quiet` keeps warnings and errors only. `RUST_LOG`
/// still applies on top.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();

    if verbose {
        builder.format_timestamp_millis();
    } else {
        builder.format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{}: {}", level.as_str().to_lowercase(), record.args()),
        });
    }

    builder.init();
}

/// Log an empty line at info level.
pub(crate) fn log_blank() {
    log::info!("");
}
