//! Runtime settings.
//!
//! Each value is resolved from, in order: an environment variable, the
//! TOML config file at `<config_dir>/dexcache/config.toml`, and a built-in
//! default. Command-line flags are applied on top by the caller.

use std::path::{Path, PathBuf};
use std::time::Duration;

use dexcache_upstream::ClientOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bootstrap::{BootstrapOptions, DEFAULT_CONCURRENCY, DEFAULT_LIMIT, FailurePolicy};
use crate::service::{DEFAULT_PAGE_SIZE, ServiceOptions};

const ENV_UPSTREAM_URL: &str = "DEXCACHE_UPSTREAM_URL";
const ENV_TIMEOUT_SECS: &str = "DEXCACHE_TIMEOUT_SECS";
const ENV_BOOTSTRAP_LIMIT: &str = "DEXCACHE_BOOTSTRAP_LIMIT";
const ENV_BOOTSTRAP_CONCURRENCY: &str = "DEXCACHE_BOOTSTRAP_CONCURRENCY";
const ENV_BOOTSTRAP_ON_ERROR: &str = "DEXCACHE_BOOTSTRAP_ON_ERROR";
const ENV_DB: &str = "DEXCACHE_DB";
const ENV_PAGE_SIZE: &str = "DEXCACHE_PAGE_SIZE";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub upstream: ClientOptions,
    pub bootstrap: BootstrapOptions,
    pub db_path: PathBuf,
    pub page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            upstream: ClientOptions::default(),
            bootstrap: BootstrapOptions::default(),
            db_path: default_db_path(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Where a setting's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingSource {
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Built-in default value.
    Default,
}

impl std::fmt::Display for SettingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// TOML config file format.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    #[serde(default)]
    pub upstream: UpstreamSection,
    #[serde(default)]
    pub bootstrap: BootstrapSection,
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub query: QuerySection,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamSection {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BootstrapSection {
    pub limit: Option<u32>,
    pub concurrency: Option<usize>,
    pub on_error: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QuerySection {
    pub page_size: Option<u32>,
}

impl SettingsFile {
    pub fn parse(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    /// Raw config-file value for a setting key, if present.
    fn raw(&self, key: &str) -> Option<String> {
        match key {
            "upstream.base_url" => self.upstream.base_url.clone(),
            "upstream.timeout_secs" => self.upstream.timeout_secs.map(|v| v.to_string()),
            "bootstrap.limit" => self.bootstrap.limit.map(|v| v.to_string()),
            "bootstrap.concurrency" => self.bootstrap.concurrency.map(|v| v.to_string()),
            "bootstrap.on_error" => self.bootstrap.on_error.clone(),
            "store.path" => self
                .store
                .path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            "query.page_size" => self.query.page_size.map(|v| v.to_string()),
            _ => None,
        }
    }
}

/// Every setting key with the environment variable that overrides it.
pub const SETTING_KEYS: [(&str, &str); 7] = [
    ("upstream.base_url", ENV_UPSTREAM_URL),
    ("upstream.timeout_secs", ENV_TIMEOUT_SECS),
    ("bootstrap.limit", ENV_BOOTSTRAP_LIMIT),
    ("bootstrap.concurrency", ENV_BOOTSTRAP_CONCURRENCY),
    ("bootstrap.on_error", ENV_BOOTSTRAP_ON_ERROR),
    ("store.path", ENV_DB),
    ("query.page_size", ENV_PAGE_SIZE),
];

impl Settings {
    /// Load settings from the environment and the config file.
    pub fn load() -> Result<Self, SettingsError> {
        let file = load_config_file()?;
        Self::resolve(file.as_ref(), |var| std::env::var(var).ok())
    }

    /// Resolve settings from an optional config file and an environment lookup.
    pub fn resolve(
        file: Option<&SettingsFile>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        let lookup = |key: &'static str, var: &'static str| -> Option<String> {
            env(var)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| file.and_then(|f| f.raw(key)))
        };

        let mut settings = Self::default();

        if let Some(url) = lookup("upstream.base_url", ENV_UPSTREAM_URL) {
            settings.upstream.base_url = check_base_url(ENV_UPSTREAM_URL, &url)?;
        }
        if let Some(raw) = lookup("upstream.timeout_secs", ENV_TIMEOUT_SECS) {
            let secs: u64 = parse_positive(ENV_TIMEOUT_SECS, &raw)?;
            settings.upstream.timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup("bootstrap.limit", ENV_BOOTSTRAP_LIMIT) {
            settings.bootstrap.limit = parse_positive(ENV_BOOTSTRAP_LIMIT, &raw)?;
        }
        if let Some(raw) = lookup("bootstrap.concurrency", ENV_BOOTSTRAP_CONCURRENCY) {
            settings.bootstrap.concurrency = parse_positive(ENV_BOOTSTRAP_CONCURRENCY, &raw)?;
        }
        if let Some(raw) = lookup("bootstrap.on_error", ENV_BOOTSTRAP_ON_ERROR) {
            settings.bootstrap.failure_policy = raw
                .parse::<FailurePolicy>()
                .map_err(|reason| invalid(ENV_BOOTSTRAP_ON_ERROR, &raw, &reason))?;
        }
        if let Some(raw) = lookup("store.path", ENV_DB) {
            settings.db_path = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("query.page_size", ENV_PAGE_SIZE) {
            settings.page_size = parse_positive(ENV_PAGE_SIZE, &raw)?;
        }

        Ok(settings)
    }

    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            bootstrap: self.bootstrap.clone(),
            page_size: self.page_size,
        }
    }
}

/// Report where each setting's value comes from.
pub fn settings_sources() -> Result<Vec<(&'static str, SettingSource)>, SettingsError> {
    let file = load_config_file()?;
    Ok(sources_from(file.as_ref(), |var| std::env::var(var).ok()))
}

fn sources_from(
    file: Option<&SettingsFile>,
    env: impl Fn(&str) -> Option<String>,
) -> Vec<(&'static str, SettingSource)> {
    SETTING_KEYS
        .iter()
        .map(|&(key, var)| {
            let source = if env(var).is_some_and(|v| !v.trim().is_empty()) {
                SettingSource::EnvVar(var)
            } else if file.and_then(|f| f.raw(key)).is_some() {
                SettingSource::ConfigFile
            } else {
                SettingSource::Default
            };
            (key, source)
        })
        .collect()
}

/// Return the path to the settings config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("dexcache").join("config.toml"))
}

/// Default database location under the user cache directory.
pub fn default_db_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("dexcache")
        .join("catalog.db")
}

fn load_config_file() -> Result<Option<SettingsFile>, SettingsError> {
    match config_path() {
        Some(path) => read_config_file(&path),
        None => Ok(None),
    }
}

/// Read a config file; a missing file is not an error.
pub fn read_config_file(path: &Path) -> Result<Option<SettingsFile>, SettingsError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SettingsError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    log::debug!("Loaded settings from {}", path.display());
    SettingsFile::parse(&text).map(Some)
}

/// Validate an upstream API root and strip any trailing slash.
///
/// `key` names the setting in the error, e.g. an env var or a CLI flag.
pub fn check_base_url(key: &'static str, raw: &str) -> Result<String, SettingsError> {
    let url = raw.trim().trim_end_matches('/');
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(invalid(key, url, "expected an http(s) URL"));
    }
    Ok(url.to_string())
}

/// Reject a zero (or negative) count or duration.
pub fn check_positive<T>(key: &'static str, value: T) -> Result<T, SettingsError>
where
    T: PartialOrd + Default + std::fmt::Display,
{
    if value <= T::default() {
        return Err(invalid(key, &value.to_string(), "must be greater than zero"));
    }
    Ok(value)
}

fn parse_positive<T>(key: &'static str, raw: &str) -> Result<T, SettingsError>
where
    T: std::str::FromStr + PartialOrd + Default + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    let value: T = raw
        .trim()
        .parse()
        .map_err(|e: T::Err| invalid(key, raw, &e.to_string()))?;
    check_positive(key, value)
}

fn invalid(key: &'static str, value: &str, reason: &str) -> SettingsError {
    SettingsError::InvalidValue {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
