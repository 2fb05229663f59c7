//! Translation of pool and Diesel failures into `LedgerStoreError`.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::LedgerStoreError;

use super::pool::PoolError;

pub(crate) fn map_pool_error(error: PoolError) -> LedgerStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            LedgerStoreError::connection(message)
        }
    }
}

/// Constraint violations keep the constraint name so logs show which rule
/// rejected the batch.
pub(crate) fn map_diesel_error(error: DieselError) -> LedgerStoreError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            LedgerStoreError::connection("database connection error")
        }
        DieselError::DatabaseError(
            DatabaseErrorKind::CheckViolation
            | DatabaseErrorKind::UniqueViolation
            | DatabaseErrorKind::ForeignKeyViolation
            | DatabaseErrorKind::NotNullViolation,
            info,
        ) => LedgerStoreError::constraint(
            info.constraint_name()
                .map_or_else(|| info.message().to_owned(), str::to_owned),
        ),
        DieselError::NotFound => LedgerStoreError::query("record not found"),
        DieselError::QueryBuilderError(_) => LedgerStoreError::query("database query error"),
        _ => LedgerStoreError::query("database error"),
    }
}
