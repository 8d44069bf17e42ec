use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dexcache_catalog::ImportOutcome;
use dexcache_sync::{check_positive, run_bootstrap};

use super::AppContext;
use crate::CliError;
use crate::cli_types::SyncArgs;
use crate::progress_bar::BarProgress;

pub(crate) fn run_sync(app: &AppContext, args: SyncArgs) -> Result<(), CliError> {
    let mut options = app.settings.bootstrap.clone();
    if let Some(limit) = args.limit {
        options.limit = check_positive("--limit", limit)?;
    }
    if let Some(concurrency) = args.concurrency {
        options.concurrency = check_positive("--concurrency", concurrency)?;
    }
    if let Some(policy) = args.on_error {
        options.failure_policy = policy;
    }

    let conn = app.open_store()?;
    let client = app.client()?;
    let progress = BarProgress::new(app.quiet);

    log::info!(
        "Importing up to {} entries from {} ({} at a time, on error: {})",
        options.limit,
        client.base_url().if_supports_color(Stdout, |t| t.cyan()),
        options.concurrency,
        options.failure_policy,
    );

    let rt = app.runtime()?;
    let report = rt
        .block_on(run_bootstrap(&conn, &client, &options, &progress))
        .map_err(|e| CliError::database(e.to_string()))?;

    let headline = report.summary();
    match report.outcome() {
        ImportOutcome::Complete => {
            log::info!("{}", headline.if_supports_color(Stdout, |t| t.green()));
        }
        ImportOutcome::Partial | ImportOutcome::Aborted => {
            log::warn!("{}", headline);
        }
        ImportOutcome::PageFailed => {
            log::error!("{}", headline);
        }
    }

    Ok(())
}
