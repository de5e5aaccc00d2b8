//! Cart persistence errors.

use std::time::Duration;

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartLinesServiceError {
    #[error("cart line already exists")]
    AlreadyExists,

    #[error("cart line not found")]
    NotFound,

    #[error("related product not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartLinesServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

/// Failure of a durable cart operation.
///
/// The store keeps its optimistic in-memory state when one of these is
/// surfaced; `load()` on the next session start reconciles.
#[derive(Debug, Error)]
pub enum CartPersistenceError {
    #[error("local cart storage error")]
    Local(#[source] std::io::Error),

    #[error("local cart serialization error")]
    Serialization(#[from] serde_json::Error),

    #[error("remote cart storage error")]
    Remote(#[from] CartLinesServiceError),

    #[error("durable cart call exceeded {0:?}")]
    Timeout(Duration),
}
