use thiserror::Error;

use crate::config::MAX_METADATA_SIZE;

/// Failures of the container codec and the encrypt/decrypt pipelines.
///
/// `Authentication` is the only outcome of a tag mismatch. It covers both a
/// wrong password and a modified container and carries no detail that would
/// tell the two apart.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid container: {0}")]
    Format(String),

    #[error("authentication failed: wrong password or corrupted data")]
    Authentication,

    #[error("fetch failed: {location}: {reason}")]
    Fetch { location: String, reason: String },

    #[error("metadata too large: {0} bytes exceeds {MAX_METADATA_SIZE}")]
    MetadataTooLarge(usize),

    #[error("encryption failed")]
    Encryption,

    #[error("key derivation failed")]
    Kdf,

    #[error("random number generator failed: {0}")]
    Rng(String),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn format(reason: impl Into<String>) -> Self {
        Self::Format(reason.into())
    }

    pub(crate) fn fetch(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch { location: location.into(), reason: reason.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
