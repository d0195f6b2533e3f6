use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("Storage directory {0:?} does not exist or is not a directory")]
    StorageDirMissing(PathBuf),

    #[error("Request key must not be empty")]
    EmptyKey,

    #[error("Invalid request key {0:?}")]
    InvalidKey(String),

    #[error("Malformed response record: {0}")]
    MalformedRecord(String),

    #[error("A broker is already installed; the new message handler was discarded")]
    AlreadyInstalled,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
