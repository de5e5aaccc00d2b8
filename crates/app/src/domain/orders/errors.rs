//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::orders::models::OrderUuid;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order already exists")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
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

/// Failure while placing an order.
#[derive(Debug, Error)]
pub enum PlaceOrderError {
    /// The cart holds no lines; nothing was written.
    #[error("cart is empty")]
    EmptyCart,

    /// Creating the order record failed; nothing was written.
    #[error("failed to create order")]
    Order(#[source] OrdersServiceError),

    /// The order exists but its lines were never written.
    ///
    /// The orphaned order id is reported so it can be found; placement is
    /// never retried automatically because a retry would create a second
    /// order, and no compensating delete is attempted because that delete
    /// can itself fail.
    #[error("order {order_number} was created without its lines")]
    PartialOrder {
        order: OrderUuid,
        order_number: String,
        #[source]
        source: OrdersServiceError,
    },
}
