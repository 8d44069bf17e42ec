/// Errors that can occur while talking to the upstream catalog.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Network failure, timeout, or a non-success HTTP status other than 404.
    #[error("Upstream unavailable: {0}")]
    Unavailable(String),

    /// The upstream catalog has no such resource.
    #[error("Not found upstream: {0}")]
    NotFound(String),

    /// The response body is not JSON or lacks required keys.
    #[error("Malformed upstream data: {0}")]
    Malformed(String),
}

impl UpstreamError {
    /// Short label for the failure kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::NotFound(_) => "not found",
            Self::Malformed(_) => "malformed",
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Malformed(e.to_string())
        } else if e.status() == Some(reqwest::StatusCode::NOT_FOUND) {
            Self::NotFound(e.to_string())
        } else {
            Self::Unavailable(e.to_string())
        }
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e.to_string())
    }
}
