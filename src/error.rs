use std::io;

use thiserror::Error;

/// Rejected guesses. Never mutates the session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuessError {
    #[error("'{0}' is not a whole number")]
    InvalidInput(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to write '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("storage rejected write to '{0}'")]
    Rejected(String),
}

/// Failures reading or writing persisted JSON. All of them are recovered
/// from by logging; none reach the player.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("could not read persisted data: {0}")]
    Read(#[source] StorageError),
    #[error("persisted data is corrupt: {0}")]
    Deserialization(#[source] serde_json::Error),
    #[error("could not encode data: {0}")]
    Serialization(#[source] serde_json::Error),
    #[error("could not persist data: {0}")]
    PersistenceWrite(#[source] StorageError),
}
