use std::path::PathBuf;

use crate::aggregator::RunState;

/// Fontvet error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Operation called in a run state that does not allow it
    #[error("invalid state: cannot {operation} while run is {state}")]
    InvalidState {
        operation: &'static str,
        state: RunState,
    },

    /// The external runner broke the message contract
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// Engine warm-up failed; the session is unusable
    #[error("engine load failed: {0}")]
    EngineLoad(String),

    /// The engine aborted a run
    #[error("engine error: {0}")]
    Engine(String),

    /// Configuration file not found or invalid
    #[error("config error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Malformed JSON payload or artifact
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error
    #[error("io error: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The session worker hung up
    #[error("session disconnected: {0}")]
    Disconnected(String),
}

/// Result type using fontvet Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
