//! Tests for HTTP error mapping.

use super::*;
use crate::domain::{Error, ProductId};
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn internal_error_case(expected_trace_id: String) -> Error {
    Error::internal("pool exhausted at db-1")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"secret": "x"}))
}

#[fixture]
fn insufficient_case(expected_trace_id: String) -> Error {
    Error::insufficient_quantity("Quantidade insuficiente. Disponível: 2")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"available": 2}))
}

#[rstest]
#[case(ErrorCode::InvalidRequest, StatusCode::BAD_REQUEST)]
#[case(ErrorCode::NotFound, StatusCode::NOT_FOUND)]
#[case(ErrorCode::InsufficientQuantity, StatusCode::UNPROCESSABLE_ENTITY)]
#[case(ErrorCode::Conflict, StatusCode::CONFLICT)]
#[case(ErrorCode::StoreWriteFailure, StatusCode::INTERNAL_SERVER_ERROR)]
#[case(ErrorCode::ConfigurationMissing, StatusCode::SERVICE_UNAVAILABLE)]
#[case(ErrorCode::ServiceUnavailable, StatusCode::SERVICE_UNAVAILABLE)]
#[case(ErrorCode::InternalError, StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] code: ErrorCode, #[case] status: StatusCode) {
    let err = Error::new(code, "message");
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn assert_error_response(
    error: Error,
    expected_status: StatusCode,
    expected_trace_id: Option<&str>,
) -> Error {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), expected_status);

    let header = response.headers().get(TRACE_ID_HEADER);
    match expected_trace_id {
        Some(expected) => {
            let trace_id = header
                .expect("trace-id header is set by error_response")
                .to_str()
                .expect("trace-id not valid UTF-8");
            assert_eq!(trace_id, expected);
        }
        None => assert!(header.is_none(), "trace-id header should not be present"),
    }

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");

    serde_json::from_slice(&bytes).expect("Error JSON deserialisation succeeds")
}

#[rstest]
#[actix_rt::test]
async fn internal_errors_are_redacted(
    #[from(internal_error_case)] internal_error: Error,
    expected_trace_id: String,
) {
    let redacted = assert_error_response(
        internal_error,
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(expected_trace_id.as_str()),
    )
    .await;

    assert_eq!(redacted.code(), ErrorCode::InternalError);
    assert_eq!(redacted.message(), "Internal server error");
    assert!(redacted.details().is_none());
}

#[rstest]
#[actix_rt::test]
async fn domain_failures_keep_message_and_details(
    #[from(insufficient_case)] insufficient: Error,
    expected_trace_id: String,
) {
    let payload = assert_error_response(
        insufficient,
        StatusCode::UNPROCESSABLE_ENTITY,
        Some(expected_trace_id.as_str()),
    )
    .await;

    assert_eq!(payload.code(), ErrorCode::InsufficientQuantity);
    assert_eq!(payload.message(), "Quantidade insuficiente. Disponível: 2");
    assert_eq!(payload.details(), Some(&json!({"available": 2})));
}

#[rstest]
#[actix_rt::test]
async fn error_without_trace_id_omits_trace_header() {
    let error = Error::invalid_request("bad").with_details(json!({"field": "title"}));

    let payload = assert_error_response(error, StatusCode::BAD_REQUEST, None).await;
    assert_eq!(payload.trace_id(), None);
    assert_eq!(payload.details(), Some(&json!({"field": "title"})));
}

#[rstest]
fn redaction_keeps_trace_id() {
    let error = Error::internal("boom").with_trace_id(TRACE_ID);

    let redacted = redact_if_internal(&error);

    assert_eq!(redacted.message(), "Internal server error");
    assert_eq!(redacted.trace_id(), Some(TRACE_ID));
}

#[test]
fn from_actix_error_is_redacted_internal_error() {
    let actix_err = actix_web::error::ErrorBadRequest("boom");
    let err: Error = actix_err.into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.trace_id(), None);
    assert_eq!(err.details(), None);
}

#[rstest]
#[actix_rt::test]
async fn successful_outcome_uses_success_status() {
    let product_id = ProductId::random();
    let outcome = TransactionOutcome::from(
        crate::domain::TransactionReceipt::new("Produto criado").with_product(product_id),
    );

    let response = outcome_response(outcome, StatusCode::CREATED);

    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = to_bytes(response.into_body()).await.expect("body");
    let body: TransactionOutcome = serde_json::from_slice(&bytes).expect("outcome json");
    assert!(body.success);
    assert_eq!(body.product_id, Some(product_id));
}

#[rstest]
#[case(Error::not_found("Produto não encontrado"), StatusCode::NOT_FOUND, "Produto não encontrado")]
#[case(Error::internal("disk on fire"), StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")]
#[actix_rt::test]
async fn failed_outcome_maps_code_to_status(
    #[case] error: Error,
    #[case] status: StatusCode,
    #[case] message: &str,
) {
    let outcome = TransactionOutcome::failed(&error.with_trace_id(TRACE_ID));

    let response = outcome_response(outcome, StatusCode::OK);

    assert_eq!(response.status(), status);
    assert_eq!(
        response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some(TRACE_ID)
    );
    let bytes = to_bytes(response.into_body()).await.expect("body");
    let body: TransactionOutcome = serde_json::from_slice(&bytes).expect("outcome json");
    assert!(!body.success);
    assert_eq!(body.message, message);
}
