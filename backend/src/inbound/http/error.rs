//! HTTP adapter mapping for domain errors and transaction outcomes.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and status
//! codes. Transaction endpoints always answer with a `TransactionOutcome`
//! body; its `code` picks the status the same way an `Error` would.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER, TransactionOutcome};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InsufficientQuantity => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::StoreWriteFailure | ErrorCode::InternalError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        ErrorCode::ConfigurationMissing | ErrorCode::ServiceUnavailable => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal(REDACTED_MESSAGE);
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(REDACTED_MESSAGE)
    }
}

/// Render a transaction outcome, choosing the status from its failure code.
///
/// `success` outcomes answer `success_status`; failed ones reuse the error
/// status table and echo the trace id header.
pub fn outcome_response(outcome: TransactionOutcome, success_status: StatusCode) -> HttpResponse {
    let status = outcome.code.map_or(success_status, status_for);
    let mut builder = HttpResponse::build(status);
    if let Some(id) = outcome.trace_id.as_deref() {
        builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
    }
    let body = if matches!(outcome.code, Some(ErrorCode::InternalError)) {
        TransactionOutcome {
            message: REDACTED_MESSAGE.to_owned(),
            ..outcome
        }
    } else {
        outcome
    };
    builder.json(body)
}

#[cfg(test)]
mod tests;
