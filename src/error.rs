//! Error types for the scroll restoration controller

use thiserror::Error;

/// Result type alias for controller operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or driving the controller
///
/// Navigation handling itself never fails; these surface only from
/// construction, the session store port, and the scenario layer.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// The session store rejected a read or write
    #[error("Session store error: {0}")]
    StoreError(String),

    /// A scenario could not be loaded or replayed
    #[error("Scenario error: {0}")]
    ScenarioError(String),

    /// I/O failure while reading scenario or config files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON input
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
