use crate::storage::StorageError;
use thiserror::Error;

/// Rejections from the dispatch path.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Only base stations poll; field units have no IP path of their own.
    #[error("device is not a polling relay")]
    NotRelay,
    #[error("{0}")]
    Storage(#[from] StorageError),
}

/// Rejections from telemetry ingestion.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("invalid telemetry report: {0}")]
    Validation(String),
    #[error("{0}")]
    Storage(#[from] StorageError),
}

/// Rejections from acknowledgment handling.
#[derive(Error, Debug)]
pub enum AckError {
    #[error("unknown command: {0}")]
    UnknownCommand(i32),
    /// Terminal command state is history; it is never overwritten.
    #[error("command {0} already settled")]
    AlreadyFinal(i32),
    #[error("{0}")]
    Storage(#[from] StorageError),
}
