//! Error types for the trivia engine.

use std::path::PathBuf;

use thiserror::Error;
use trivia_core::StoreError;

/// Result type for bot operations.
pub type BotResult<T> = Result<T, BotError>;

/// Errors that can occur while running the minigame.
#[derive(Debug, Error)]
pub enum BotError {
    /// Bad chat input. The message is meant for the chatter and is posted
    /// back to chat instead of being raised to the host.
    #[error("{0}")]
    UserInput(String),

    /// The settings are unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The question store could not be persisted.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A settings or display file could not be written.
    #[error("cannot write {path}: {source}")]
    Persistence {
        /// The file being written.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The host failed to answer a game detection request.
    #[error("game detection failed: {0}")]
    Detection(String),
}
