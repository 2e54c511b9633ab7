pub mod auth;
pub mod gateway;
pub mod storage;
pub mod web;

use anyhow::Error as AnyhowError;
use config::ConfigError;
use sea_orm::DbErr;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use storage::StorageError;
use thiserror::Error;
use tokio::task::JoinError;
use web::WebError;

pub type PyroResult<T, E = PyroError> = anyhow::Result<T, E>;
pub type WebResult<T, E = WebError> = anyhow::Result<T, E>;
pub type StorageResult<T, E = StorageError> = Result<T, E>;

#[derive(Error, Debug, Default)]
pub enum PyroError {
    #[error("service unavailable")]
    #[default]
    ServiceUnavailable,
    #[error("{0}")]
    Msg(String),
    #[error("{0}")]
    JoinError(#[from] JoinError),
    #[error("{0}")]
    IoError(#[from] IoError),
    #[error("{0}")]
    Anyhow(#[from] AnyhowError),
    #[error("{0}")]
    Json(#[from] SerdeJsonError),
    #[error("{0}")]
    ConfigError(#[from] ConfigError),
    #[error("{0}")]
    StorageError(#[from] StorageError),
    #[error("{0}")]
    WebError(#[from] WebError),
}

impl From<String> for PyroError {
    #[inline]
    fn from(e: String) -> Self {
        PyroError::Msg(e)
    }
}

impl From<&str> for PyroError {
    #[inline]
    fn from(e: &str) -> Self {
        PyroError::Msg(e.to_string())
    }
}

impl From<DbErr> for PyroError {
    #[inline]
    fn from(e: DbErr) -> Self {
        PyroError::StorageError(StorageError::DBError(e))
    }
}
