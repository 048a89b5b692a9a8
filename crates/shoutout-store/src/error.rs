use thiserror::Error;

/// Failures of the durable storage layer. These never reach feed consumers;
/// the adapter logs them and carries on with in-memory state.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed feed record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("storage quota exceeded ({needed} bytes needed, {quota} allowed)")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("storage lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;
