use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::{
    auth::AuthError,
    gateway::{AckError, DispatchError, IngestError},
    storage::StorageError,
};

#[derive(Error, Debug)]
pub enum WebError {
    /// Deliberately carries no detail: the wire response is uniform for
    /// every admission failure. The precise kind lives in the logs.
    #[error("authentication failed")]
    Unauthorized,
    #[error("BadRequest: `{0}`")]
    BadRequest(String),
    #[error("`{0}` not found")]
    NotFound(String),
    #[error("Conflict: `{0}`")]
    Conflict(String),
    #[error("InternalError: `{0}`")]
    InternalError(String),
    #[error("DBError: `{0}`")]
    StorageError(StorageError),
}

impl From<std::io::Error> for WebError {
    fn from(e: std::io::Error) -> Self {
        WebError::InternalError(e.to_string())
    }
}

impl From<StorageError> for WebError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::EntityNotFound(msg) => WebError::NotFound(msg),
            StorageError::Conflict(msg) => WebError::Conflict(msg),
            other => WebError::StorageError(other),
        }
    }
}

impl From<AuthError> for WebError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingBoardId => WebError::BadRequest("missing board identifier".into()),
            // A failing directory lookup is an outage, not a rejection.
            AuthError::Storage(inner) => inner.into(),
            _ => WebError::Unauthorized,
        }
    }
}

impl From<DispatchError> for WebError {
    fn from(e: DispatchError) -> Self {
        match e {
            DispatchError::NotRelay => WebError::BadRequest(e.to_string()),
            DispatchError::Storage(inner) => inner.into(),
        }
    }
}

impl From<IngestError> for WebError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::Validation(msg) => WebError::BadRequest(msg),
            IngestError::Storage(inner) => inner.into(),
        }
    }
}

impl From<AckError> for WebError {
    fn from(e: AckError) -> Self {
        match e {
            AckError::UnknownCommand(id) => WebError::NotFound(format!("command {id}")),
            AckError::AlreadyFinal(_) => WebError::Conflict(e.to_string()),
            AckError::Storage(inner) => inner.into(),
        }
    }
}

impl ResponseError for WebError {
    fn error_response(&self) -> HttpResponse {
        let mut body = json!({
            "message": self.to_string()
        });
        match self {
            WebError::Unauthorized => {
                body["error"] = json!("Unauthorized");
                HttpResponse::Unauthorized().json(body)
            }
            WebError::BadRequest(_) => {
                body["error"] = json!("Bad Request");
                HttpResponse::BadRequest().json(body)
            }
            WebError::NotFound(_) => {
                body["error"] = json!("Not Found");
                HttpResponse::NotFound().json(body)
            }
            WebError::Conflict(_) => {
                body["error"] = json!("Conflict");
                HttpResponse::Conflict().json(body)
            }
            WebError::InternalError(_) | WebError::StorageError(_) => {
                // Device-facing responses never expose internals.
                body["message"] = json!("internal error");
                body["error"] = json!("Internal Server Error");
                HttpResponse::InternalServerError().json(body)
            }
        }
    }
}
