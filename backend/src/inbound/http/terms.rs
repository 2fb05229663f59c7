//! Custody term dispatch handler.
//!
//! ```text
//! POST /api/v1/terms {"productId":"…","employeeId":"…","quantity":1,
//!                     "adminName":"Root","pdfBase64":"JVBERi0…"}
//! ```
//!
//! The term goes to the signature webhook first; the assignment is only
//! recorded once the webhook accepts it.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::TransactionOutcome;
use crate::domain::ports::DispatchTermRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::outcome_response;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

const PRODUCT_ID: FieldName = FieldName::new("productId");
const EMPLOYEE_ID: FieldName = FieldName::new("employeeId");

/// Body of `POST /api/v1/terms`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DispatchTermBody {
    pub product_id: String,
    pub employee_id: String,
    #[serde(default = "one")]
    pub quantity: u32,
    pub admin_name: String,
    /// Rendered custody term, base64-encoded PDF.
    pub pdf_base64: String,
}

fn one() -> u32 {
    1
}

/// Send a custody term for signature, then record the assignment.
#[utoipa::path(
    post,
    path = "/api/v1/terms",
    request_body = DispatchTermBody,
    responses(
        (
            status = 200,
            description = "Term sent and assignment recorded",
            body = TransactionOutcome
        ),
        (status = 400, description = "Invalid payload", body = TransactionOutcome),
        (status = 422, description = "Insufficient quantity", body = TransactionOutcome),
        (status = 503, description = "Webhook missing or unreachable", body = TransactionOutcome)
    ),
    tags = ["terms"],
    operation_id = "dispatchTerm"
)]
#[post("/terms")]
pub async fn dispatch_term(
    state: web::Data<HttpState>,
    payload: web::Json<DispatchTermBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = DispatchTermRequest {
        product_id: parse_id(&body.product_id, PRODUCT_ID)?,
        employee_id: parse_id(&body.employee_id, EMPLOYEE_ID)?,
        quantity: body.quantity,
        admin_name: body.admin_name,
        pdf_base64: body.pdf_base64,
    };
    let outcome = state.terms.dispatch(request).await;
    Ok(outcome_response(outcome, StatusCode::OK))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmployeeId, Error, ProductId};
    use crate::inbound::http::test_utils::{TestPorts, test_app};
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[actix_rt::test]
    async fn unconfigured_webhook_is_503() {
        let mut ports = TestPorts::default();
        ports
            .terms
            .expect_dispatch()
            .withf(|req| req.quantity == 1 && req.admin_name == "Root")
            .times(1)
            .return_once(|_| {
                TransactionOutcome::failed(&Error::configuration_missing(
                    "term webhook is not configured",
                ))
            });
        let app = actix_test::init_service(test_app(ports.into_state())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/terms")
                .set_json(json!({
                    "productId": ProductId::random().to_string(),
                    "employeeId": EmployeeId::random().to_string(),
                    "adminName": "Root",
                    "pdfBase64": "JVBERi0=",
                }))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], "configuration_missing");
    }
}
