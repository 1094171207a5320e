//! Error types for Finn.

use thiserror::Error;

/// Library-level error type for Finn operations.
#[derive(Error, Debug)]
pub enum FinnError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Secret not found: {scope}/{key}")]
    Secret { scope: String, key: String },

    #[error("Search request failed: {0}")]
    Search(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Agent error: {0}")]
    Agent(String),
}

/// Result type alias for Finn operations.
pub type Result<T> = std::result::Result<T, FinnError>;
