pub(crate) mod config;
pub(crate) mod favorite;
pub(crate) mod list;
pub(crate) mod show;
pub(crate) mod stats;
pub(crate) mod sync;
pub(crate) mod types;

use std::path::PathBuf;

use dexcache_db::Connection;
use dexcache_sync::{Settings, check_base_url};
use dexcache_upstream::UpstreamClient;

use crate::CliError;

/// Settings resolved for one invocation, with command-line overrides applied.
pub(crate) struct AppContext {
    pub settings: Settings,
    pub quiet: bool,
}

impl AppContext {
    pub(crate) fn load(
        db: Option<PathBuf>,
        upstream: Option<String>,
        quiet: bool,
    ) -> Result<Self, CliError> {
        let mut settings = Settings::load()?;
        if let Some(path) = db {
            settings.db_path = path;
        }
        if let Some(url) = upstream {
            settings.upstream.base_url = check_base_url("--upstream", &url)?;
        }
        Ok(Self { settings, quiet })
    }

    pub(crate) fn open_store(&self) -> Result<Connection, CliError> {
        log::debug!("Opening catalog database at {}", self.settings.db_path.display());
        dexcache_db::open_database(&self.settings.db_path).map_err(|e| {
            CliError::database(format!(
                "Failed to open {}: {}",
                self.settings.db_path.display(),
                e
            ))
        })
    }

    pub(crate) fn client(&self) -> Result<UpstreamClient, CliError> {
        UpstreamClient::new(&self.settings.upstream)
            .map_err(|e| CliError::upstream(format!("Failed to build HTTP client: {}", e)))
    }

    pub(crate) fn runtime(&self) -> Result<tokio::runtime::Runtime, CliError> {
        tokio::runtime::Runtime::new()
            .map_err(|e| CliError::runtime(format!("Failed to create tokio runtime: {}", e)))
    }
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
