use thiserror::Error;

/// Failures reported by a page session.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("bot challenge served instead of {url}")]
    BotChallenge { url: String },

    #[error("timed out after {timeout_secs}s waiting for {what}")]
    Timeout { what: String, timeout_secs: u64 },

    #[error("selector did not match: {selector}")]
    SelectorNotFound { selector: String },

    #[error("page session does not support {operation}")]
    Unsupported { operation: &'static str },

    #[error("script evaluation failed: {0}")]
    Evaluate(String),
}

impl PageError {
    /// True when the session cannot perform the operation at all, as opposed
    /// to the operation failing on this particular page.
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, PageError::Unsupported { .. })
    }
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("failed to load {url}: {source}")]
    Navigation {
        url: String,
        #[source]
        source: PageError,
    },

    #[error("page session error: {0}")]
    Page(#[from] PageError),

    #[error("failed to write {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
