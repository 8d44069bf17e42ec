use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use super::AppContext;
use crate::CliError;

const RECENT_IMPORTS: u32 = 5;

pub(crate) fn run_stats(app: &AppContext) -> Result<(), CliError> {
    let db_path = &app.settings.db_path;

    if !db_path.exists() {
        log::warn!("No catalog database found at {}", db_path.display());
        log::info!("Run 'dexcache sync' to create one.");
        return Ok(());
    }

    let conn = app.open_store()?;

    let stats = dexcache_db::catalog_stats(&conn)
        .map_err(|e| CliError::database(format!("Failed to query catalog stats: {}", e)))?;

    log::info!(
        "{}",
        "Catalog Database Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Database: {}", db_path.display());
    crate::log_blank();
    log::info!("  Entries:        {:>8}", stats.entries);
    log::info!("  Favorites:      {:>8}", stats.favorites);
    log::info!("  Types:          {:>8}", stats.types);
    log::info!("  Abilities:      {:>8}", stats.abilities);
    log::info!("  Imports:        {:>8}", stats.imports);

    let logs = dexcache_db::list_import_logs(&conn, Some(RECENT_IMPORTS))
        .map_err(|e| CliError::database(format!("Failed to query import log: {}", e)))?;
    if logs.is_empty() {
        return Ok(());
    }

    crate::log_blank();
    log::info!("{}", "Recent imports".if_supports_color(Stdout, |t| t.bold()));
    for entry in &logs {
        log::info!(
            "  {}  {:<11} {:>3}/{:<3} imported, {} failed",
            entry.started_at.if_supports_color(Stdout, |t| t.dimmed()),
            entry.outcome.as_str(),
            entry.entries_imported,
            entry.references_seen,
            entry.failures,
        );
    }

    Ok(())
}
