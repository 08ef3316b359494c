//! Error types for the collection appraiser.
//!
//! Only two conditions are fatal: an unusable exchange-rate table and an
//! invalid configuration. Everything else in the pipeline is absorbed
//! locally and reported through the diagnostics accumulator.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the collection appraiser.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Exchange-rate table is missing or unusable.
    #[error("Rate table error: {0}")]
    RateTable(String),

    /// Data error (invalid or missing data).
    #[error("Data error: {0}")]
    Data(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a rate table error.
    pub fn rate_table(msg: impl Into<String>) -> Self {
        Error::RateTable(msg.into())
    }

    /// Create a data error.
    pub fn data(msg: impl Into<String>) -> Self {
        Error::Data(msg.into())
    }
}
