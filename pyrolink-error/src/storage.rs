use thiserror::Error;

#[derive(Error, Debug, Default)]
pub enum StorageError {
    #[error("database unavailable")]
    #[default]
    StorageUnavailable,

    #[error("database error: `{0}`")]
    DBError(#[from] sea_orm::DbErr),

    #[error("entity not found: {0}")]
    EntityNotFound(String),

    /// Uniqueness violation. Auto-discovery races land here and are
    /// resolved to the existing record by the caller.
    #[error("record already exists: {0}")]
    Conflict(String),
}
