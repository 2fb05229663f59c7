//! Employee directory HTTP handlers.
//!
//! ```text
//! GET    /api/v1/employees
//! POST   /api/v1/employees
//! GET    /api/v1/employees/lookup?email=ana@example.com
//! PATCH  /api/v1/employees/{id}
//! DELETE /api/v1/employees/{id}
//! GET    /api/v1/employees/{id}/assets
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{EmployeeDraft, EmployeePatch, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{EmployeeResponse, ProductResponse, collect};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, double_option, missing_field_error, normalise_search, parse_id,
};

const EMPLOYEE_ID: FieldName = FieldName::new("employeeId");
const EMAIL: FieldName = FieldName::new("email");

/// Body of `POST /api/v1/employees`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    pub name: String,
    #[schema(example = "123.456.789-00")]
    pub cpf: String,
    pub sector: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<CreateEmployeeRequest> for EmployeeDraft {
    fn from(body: CreateEmployeeRequest) -> Self {
        Self {
            name: body.name,
            cpf: body.cpf,
            sector: body.sector,
            email: body.email,
            phone: body.phone,
        }
    }
}

/// Body of `PATCH /api/v1/employees/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub sector: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
}

impl From<UpdateEmployeeRequest> for EmployeePatch {
    fn from(body: UpdateEmployeeRequest) -> Self {
        Self {
            name: body.name,
            cpf: body.cpf,
            sector: body.sector,
            email: body.email,
            phone: body.phone,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct EmailQuery {
    /// Matched case-insensitively.
    pub email: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/employees",
    responses(
        (status = 200, description = "Employees ordered by name", body = [EmployeeResponse]),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["employees"],
    operation_id = "listEmployees"
)]
#[get("/employees")]
pub async fn list_employees(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<EmployeeResponse>>> {
    let employees = state.directory_query.list_employees().await?;
    Ok(web::Json(collect(employees)))
}

#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployeeRequest,
    responses(
        (status = 201, description = "Employee registered", body = EmployeeResponse),
        (status = 400, description = "Blank required field", body = Error)
    ),
    tags = ["employees"],
    operation_id = "createEmployee"
)]
#[post("/employees")]
pub async fn create_employee(
    state: web::Data<HttpState>,
    payload: web::Json<CreateEmployeeRequest>,
) -> ApiResult<HttpResponse> {
    let employee = state
        .directory
        .create_employee(payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(EmployeeResponse::from(employee)))
}

/// Find the employee registered under an email address.
#[utoipa::path(
    get,
    path = "/api/v1/employees/lookup",
    params(EmailQuery),
    responses(
        (status = 200, description = "Matching employee", body = EmployeeResponse),
        (status = 400, description = "Missing email", body = Error),
        (status = 404, description = "No employee with that email", body = Error)
    ),
    tags = ["employees"],
    operation_id = "findEmployeeByEmail"
)]
#[get("/employees/lookup")]
pub async fn find_employee_by_email(
    state: web::Data<HttpState>,
    query: web::Query<EmailQuery>,
) -> ApiResult<web::Json<EmployeeResponse>> {
    let email =
        normalise_search(query.into_inner().email).ok_or_else(|| missing_field_error(EMAIL))?;
    let employee = state.directory_query.find_employee_by_email(email).await?;
    Ok(web::Json(employee.into()))
}

#[utoipa::path(
    patch,
    path = "/api/v1/employees/{id}",
    params(("id" = String, Path, description = "Employee id")),
    request_body = UpdateEmployeeRequest,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeResponse),
        (status = 400, description = "Invalid patch", body = Error),
        (status = 404, description = "Unknown employee", body = Error)
    ),
    tags = ["employees"],
    operation_id = "updateEmployee"
)]
#[patch("/employees/{id}")]
pub async fn update_employee(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateEmployeeRequest>,
) -> ApiResult<web::Json<EmployeeResponse>> {
    let id = parse_id(&path, EMPLOYEE_ID)?;
    let employee = state
        .directory
        .update_employee(id, payload.into_inner().into())
        .await?;
    Ok(web::Json(employee.into()))
}

/// Remove an employee who holds no assets.
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{id}",
    params(("id" = String, Path, description = "Employee id")),
    responses(
        (status = 204, description = "Employee removed"),
        (status = 404, description = "Unknown employee", body = Error),
        (status = 409, description = "Employee still holds assets", body = Error)
    ),
    tags = ["employees"],
    operation_id = "deleteEmployee"
)]
#[delete("/employees/{id}")]
pub async fn delete_employee(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path, EMPLOYEE_ID)?;
    state.directory.delete_employee(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Products currently assigned to an employee.
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}/assets",
    params(("id" = String, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Assigned products", body = [ProductResponse]),
        (status = 404, description = "Unknown employee", body = Error)
    ),
    tags = ["employees"],
    operation_id = "listEmployeeAssets"
)]
#[get("/employees/{id}/assets")]
pub async fn employee_assets(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ProductResponse>>> {
    let id = parse_id(&path, EMPLOYEE_ID)?;
    let products = state.directory_query.assets_held_by(id).await?;
    Ok(web::Json(collect(products)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Employee, EmployeeId};
    use crate::inbound::http::test_utils::{TestPorts, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    #[fixture]
    fn ana() -> Employee {
        Employee {
            id: EmployeeId::random(),
            name: "Ana".to_owned(),
            cpf: "123".to_owned(),
            sector: "Ops".to_owned(),
            email: Some("ana@example.com".to_owned()),
            phone: None,
        }
    }

    async fn call(ports: TestPorts, request: actix_test::TestRequest) -> (StatusCode, Value) {
        let app = actix_test::init_service(test_app(ports.into_state())).await;
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    #[rstest]
    #[actix_rt::test]
    async fn create_returns_201_with_employee(ana: Employee) {
        let mut ports = TestPorts::default();
        let created = ana.clone();
        ports
            .directory
            .expect_create_employee()
            .withf(|draft| draft.name == "Ana" && draft.phone.is_none())
            .times(1)
            .return_once(move |_| Ok(created));

        let (status, body) = call(
            ports,
            actix_test::TestRequest::post()
                .uri("/api/v1/employees")
                .set_json(json!({ "name": "Ana", "cpf": "123", "sector": "Ops" })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], json!(ana.id.to_string()));
    }

    #[rstest]
    #[actix_rt::test]
    async fn lookup_requires_email() {
        let (status, body) = call(
            TestPorts::default(),
            actix_test::TestRequest::get().uri("/api/v1/employees/lookup"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], "email");
    }

    #[rstest]
    #[actix_rt::test]
    async fn lookup_forwards_email(ana: Employee) {
        let mut ports = TestPorts::default();
        ports
            .directory_query
            .expect_find_employee_by_email()
            .with(eq("ANA@example.com".to_owned()))
            .times(1)
            .return_once(move |_| Ok(ana));

        let (status, body) = call(
            ports,
            actix_test::TestRequest::get().uri("/api/v1/employees/lookup?email=ANA@example.com"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Ana");
    }

    #[rstest]
    #[actix_rt::test]
    async fn delete_conflict_surfaces_as_409() {
        let id = EmployeeId::random();
        let mut ports = TestPorts::default();
        ports
            .directory
            .expect_delete_employee()
            .with(eq(id))
            .times(1)
            .return_once(|_| Err(Error::conflict("employee still holds 1 asset(s)")));

        let (status, body) = call(
            ports,
            actix_test::TestRequest::delete().uri(&format!("/api/v1/employees/{id}")),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "conflict");
    }

    #[rstest]
    #[actix_rt::test]
    async fn delete_answers_204() {
        let mut ports = TestPorts::default();
        ports
            .directory
            .expect_delete_employee()
            .times(1)
            .return_once(|_| Ok(()));

        let (status, _) = call(
            ports,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/employees/{}", EmployeeId::random())),
        )
        .await;

        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
