use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dexcache_catalog::{EntryDetail, StatKind};
use dexcache_sync::QueryService;

use super::{AppContext, print_json};
use crate::CliError;

pub(crate) fn run_show(app: &AppContext, id: i64, json: bool) -> Result<(), CliError> {
    let conn = app.open_store()?;
    let client = app.client()?;
    let service = QueryService::new(&conn, &client, app.settings.service_options());

    let rt = app.runtime()?;
    let record = rt.block_on(service.get_entry(id))?;

    if json {
        return print_json(&EntryDetail::from(&record));
    }

    let entry = &record.entry;
    log::info!(
        "{} {}{}",
        format!("#{}", entry.id).if_supports_color(Stdout, |t| t.dimmed()),
        entry.name.if_supports_color(Stdout, |t| t.bold()),
        if entry.favorite {
            format!(" {}", "(favorite)".if_supports_color(Stdout, |t| t.yellow()))
        } else {
            String::new()
        },
    );
    log::info!("  Height: {}  Weight: {}", entry.height, entry.weight);
    log::info!(
        "  Types:  {}",
        record
            .type_names()
            .join(", ")
            .if_supports_color(Stdout, |t| t.cyan()),
    );

    let abilities: Vec<String> = record
        .abilities
        .iter()
        .map(|a| {
            if a.is_hidden {
                format!("{} (hidden)", a.name)
            } else {
                a.name.clone()
            }
        })
        .collect();
    log::info!("  Abilities: {}", abilities.join(", "));

    crate::log_blank();
    for kind in StatKind::ALL {
        log::info!("  {:<16} {:>4}", kind.as_str(), entry.stats.get(kind));
    }

    if let Some(url) = entry
        .sprites
        .official_artwork
        .as_deref()
        .or(entry.sprites.front_default.as_deref())
    {
        crate::log_blank();
        log::info!("  Sprite: {}", url.if_supports_color(Stdout, |t| t.underline()));
    }

    Ok(())
}
