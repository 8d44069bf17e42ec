use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Database could not be opened or queried
    #[error("Database error: {0}")]
    Database(String),

    /// Upstream client could not be built
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Entry not in the store and not available upstream
    #[error("{0}")]
    NotFound(String),

    /// Bad page number or other invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Output could not be rendered
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    pub(crate) fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub(crate) fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }
}

impl From<dexcache_sync::SettingsError> for CliError {
    fn from(e: dexcache_sync::SettingsError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<dexcache_sync::QueryError> for CliError {
    fn from(e: dexcache_sync::QueryError) -> Self {
        use dexcache_sync::QueryError;
        match e {
            QueryError::EntryNotFound(id) => Self::NotFound(format!("No entry with id {id}")),
            QueryError::InvalidPage(page) => Self::InvalidRequest(format!("page {page} does not exist")),
            other => Self::Database(other.to_string()),
        }
    }
}
