//! Error types for the media renamer.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the media renamer.
#[derive(Error, Debug)]
pub enum Error {
    // Preflight errors
    #[error("TMDB API key not configured. Set TMDB_API_KEY or create a .tmdb-api-key file")]
    TmdbApiKeyMissing,

    #[error("TMDB API key invalid")]
    TmdbApiKeyInvalid,

    // File system errors
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    // Resolution errors
    #[error("Title search failed for every query; aborting the run")]
    SearchUnavailable,

    // Plan errors
    #[error("Invalid plan file: {0}")]
    InvalidPlanFile(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
