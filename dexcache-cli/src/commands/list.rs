use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dexcache_catalog::EntrySummary;
use dexcache_sync::{ListQuery, QueryService, check_positive};

use super::{AppContext, print_json};
use crate::CliError;
use crate::cli_types::ListArgs;
use crate::progress_bar::BarProgress;

pub(crate) fn run_list(app: &AppContext, args: ListArgs) -> Result<(), CliError> {
    let conn = app.open_store()?;
    let client = app.client()?;
    let progress = BarProgress::new(app.quiet || args.json);
    let service = QueryService::new(&conn, &client, app.settings.service_options())
        .with_progress(&progress);

    let page_size = args
        .page_size
        .map(|size| check_positive("--page-size", size))
        .transpose()?;

    let query = ListQuery {
        name: args.name,
        type_name: args.type_name,
        favorites_only: args.favorites,
        page: args.page,
        page_size,
    };

    let rt = app.runtime()?;
    let page = rt
        .block_on(service.list_entries(&query))?
        .map(|record| EntrySummary::from(&record));

    if args.json {
        return print_json(&page);
    }

    if page.results.is_empty() {
        log::info!("No entries found.");
        return Ok(());
    }

    for summary in &page.results {
        let types: Vec<&str> = summary.types.iter().map(|t| t.name.as_str()).collect();
        log::info!(
            "  {:>5}  {:<20} {}{}",
            format!("#{}", summary.id).if_supports_color(Stdout, |t| t.dimmed()),
            summary.name.if_supports_color(Stdout, |t| t.bold()),
            types.join(", ").if_supports_color(Stdout, |t| t.cyan()),
            if summary.favorite {
                format!(" {}", "*".if_supports_color(Stdout, |t| t.yellow()))
            } else {
                String::new()
            },
        );
    }
    crate::log_blank();
    log::info!(
        "Page {} of {} ({} entries){}",
        page.page,
        page.num_pages,
        page.count,
        if page.has_next {
            format!(", next: --page {}", page.page + 1)
        } else {
            String::new()
        },
    );

    Ok(())
}
