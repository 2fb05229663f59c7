//! Mapping of ledger store failures into user-facing domain errors.
//!
//! Backend detail goes to the log; callers only see a generic message.

use tracing::error;

use super::Error;
use super::ports::LedgerStoreError;

pub(crate) fn map_read_error(err: LedgerStoreError) -> Error {
    error!(kind = err.kind(), error = %err, "ledger store read failed");
    match err {
        LedgerStoreError::Connection { .. } => {
            Error::service_unavailable("The inventory store is unavailable. Try again shortly.")
        }
        LedgerStoreError::Query { .. }
        | LedgerStoreError::MissingRow { .. }
        | LedgerStoreError::Constraint { .. } => {
            Error::internal("The inventory store returned an unexpected error.")
        }
    }
}

pub(crate) fn map_write_error(err: LedgerStoreError) -> Error {
    error!(kind = err.kind(), error = %err, "ledger store write failed");
    Error::store_write_failure("The change could not be saved. Nothing was modified.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(LedgerStoreError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(LedgerStoreError::query("bad row"), ErrorCode::InternalError)]
    fn read_errors_map_by_kind(#[case] err: LedgerStoreError, #[case] expected: ErrorCode) {
        assert_eq!(map_read_error(err).code(), expected);
    }

    #[rstest]
    fn write_errors_hide_backend_detail() {
        let err = map_write_error(LedgerStoreError::constraint("products_quantity_check"));
        assert_eq!(err.code(), ErrorCode::StoreWriteFailure);
        assert!(!err.message().contains("products_quantity_check"));
    }
}
