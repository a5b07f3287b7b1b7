use thiserror::Error;

/// Failure taxonomy for one lookup request.
///
/// Every variant is terminal: the pipeline never returns partial results.
/// The server layer maps each kind to an HTTP status and a user-facing
/// message; internal detail (`UpstreamError` status, transport errors) is
/// surfaced to clients only in development mode.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("handle query parameter is required")]
    MissingHandle,

    #[error("account @{0} not found")]
    AccountNotFound(String),

    #[error("no posts matched the configured keywords")]
    NoMatchingContent,

    #[error("upstream quota exhausted")]
    QuotaExceeded,

    #[error("upstream rate limit hit")]
    RateLimited,

    #[error("upstream returned status {status}")]
    UpstreamError { status: u16 },

    #[error("all {attempted} mirror endpoints failed or timed out")]
    AllMirrorsExhausted { attempted: usize },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("response parse error in {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("normalization error: {0}")]
    Normalization(String),
}
