//! Error taxonomy
//!
//! Configuration and data problems are detected eagerly, before the first
//! tick runs. A run that hits the tick cap is a completion status
//! (`sim::Outcome::Stalled`), never an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration: unknown strategy name, non-positive physical
    /// constants, paddle wider than the playfield.
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed or inconsistent activity data: out-of-order dates, a window
    /// that is not a whole number of weeks, an empty calendar.
    #[error("activity data error: {0}")]
    Data(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot format error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }
}
