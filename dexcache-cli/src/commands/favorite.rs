use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dexcache_catalog::FavoriteState;
use dexcache_sync::QueryService;

use super::{AppContext, print_json};
use crate::CliError;

pub(crate) fn run_favorite(app: &AppContext, id: i64, json: bool) -> Result<(), CliError> {
    let conn = app.open_store()?;
    let client = app.client()?;
    let service = QueryService::new(&conn, &client, app.settings.service_options());

    let rt = app.runtime()?;
    let record = rt.block_on(service.toggle_favorite(id))?;
    let state = FavoriteState::from(&record);

    if json {
        return print_json(&state);
    }

    if state.favorite {
        log::info!(
            "{} is now a {}",
            state.name.if_supports_color(Stdout, |t| t.bold()),
            "favorite".if_supports_color(Stdout, |t| t.yellow()),
        );
    } else {
        log::info!(
            "{} is no longer a favorite",
            state.name.if_supports_color(Stdout, |t| t.bold()),
        );
    }

    Ok(())
}
