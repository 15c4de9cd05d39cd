//! Error types for gitfleet-github.

use thiserror::Error;

/// Anything that prevents fetching the remote inventory. All of these are
/// fatal to a run.
#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GITHUB_TOKEN is not set; export a personal access token to query GitHub")]
    MissingToken,

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("GitHub returned HTTP {status} for {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("still rate limited by GitHub after {attempts} attempts: {url}")]
    RateLimited { url: String, attempts: u32 },

    #[error("failed to read response body from {url}: {source}")]
    ReadBody {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("unknown clone protocol '{0}' (expected ssh or https)")]
    Protocol(String),
}
