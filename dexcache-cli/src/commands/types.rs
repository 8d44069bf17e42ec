use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dexcache_sync::QueryService;

use super::{AppContext, print_json};
use crate::CliError;

pub(crate) fn run_types(app: &AppContext, json: bool) -> Result<(), CliError> {
    let conn = app.open_store()?;
    let client = app.client()?;
    let service = QueryService::new(&conn, &client, app.settings.service_options());

    let names = service.list_type_names()?;

    if json {
        return print_json(&names);
    }

    if names.is_empty() {
        log::info!("No types stored yet. Run 'dexcache sync' or 'dexcache list' first.");
        return Ok(());
    }

    for name in &names {
        log::info!("  {}", name.if_supports_color(Stdout, |t| t.cyan()));
    }
    Ok(())
}
