//! Error types for the record source and configuration layers.
//!
//! The aggregator and dashboard builders are total and never return these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Postgres query error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON snapshot parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV snapshot parsing error
    #[error("CSV error in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// Config file parsing error
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
