use crate::storage::StorageError;
use thiserror::Error;

/// Admission rejections for gateway-facing requests.
///
/// Kinds stay distinguishable here for logs and counters even though the
/// public response collapses them into a uniform rejection; authentication
/// failures are a security signal, not just a bug signal.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("missing timestamp or signature")]
    MissingCredentials,
    #[error("timestamp outside the accepted window")]
    StaleTimestamp,
    #[error("unparsable timestamp")]
    InvalidTimestamp,
    #[error("missing board identifier")]
    MissingBoardId,
    #[error("unknown device: {0}")]
    UnknownDevice(String),
    #[error("device not provisioned: {0}")]
    NotProvisioned(String),
    #[error("signature mismatch")]
    BadSignature,
    #[error("{0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Stable kind token for structured logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "missing-credentials",
            Self::StaleTimestamp => "stale-timestamp",
            Self::InvalidTimestamp => "invalid-timestamp",
            Self::MissingBoardId => "missing-board-id",
            Self::UnknownDevice(_) => "unknown-device",
            Self::NotProvisioned(_) => "not-provisioned",
            Self::BadSignature => "bad-signature",
            Self::Storage(_) => "storage",
        }
    }
}
