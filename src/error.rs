//! Error types for notion-sync.

/// Top-level error type for a sync run.
///
/// Only these three kinds end a run. Per-field and per-row failures are
/// absorbed by the mapper and the writer and never reach this type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors talking to the Notion query API.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Request failed: {reason}")]
    Http { reason: String },

    #[error("Notion returned HTTP {status} ({code}): {message}")]
    Status {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Invalid response from Notion: {reason}")]
    InvalidResponse { reason: String },

    #[error("Notion returned cursor {cursor}, which was already requested in this fetch")]
    RepeatedCursor { cursor: String },
}

/// Database-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Schema setup failed: {0}")]
    Migration(String),
}

/// Result type alias for a sync run.
pub type Result<T> = std::result::Result<T, Error>;
