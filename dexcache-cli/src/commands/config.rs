use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dexcache_sync::{SettingSource, Settings};

use crate::CliError;

/// Show resolved settings and where each value came from.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = dexcache_sync::config_path();
    let settings = Settings::load()?;
    let sources = dexcache_sync::settings_sources()?;

    log::info!(
        "{}",
        "dexcache Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    match &path {
        Some(p) if p.exists() => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            log::info!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
    crate::log_blank();

    for (key, source) in &sources {
        let value = match *key {
            "upstream.base_url" => settings.upstream.base_url.clone(),
            "upstream.timeout_secs" => settings.upstream.timeout.as_secs().to_string(),
            "bootstrap.limit" => settings.bootstrap.limit.to_string(),
            "bootstrap.concurrency" => settings.bootstrap.concurrency.to_string(),
            "bootstrap.on_error" => settings.bootstrap.failure_policy.to_string(),
            "store.path" => settings.db_path.display().to_string(),
            "query.page_size" => settings.page_size.to_string(),
            _ => continue,
        };
        let source_str = format!("({})", source);
        log::info!(
            "  {:<22} {} {}",
            key,
            value,
            if *source == SettingSource::Default {
                source_str.if_supports_color(Stdout, |t| t.dimmed()).to_string()
            } else {
                source_str.if_supports_color(Stdout, |t| t.green()).to_string()
            },
        );
    }

    Ok(())
}

/// Print the config file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    match dexcache_sync::config_path() {
        Some(p) => {
            println!("{}", p.display());
            Ok(())
        }
        None => Err(CliError::config("Could not determine config directory")),
    }
}
