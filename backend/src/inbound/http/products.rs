//! Product ledger HTTP handlers.
//!
//! ```text
//! GET    /api/v1/products?search=lap
//! POST   /api/v1/products
//! GET    /api/v1/products/{id}
//! PATCH  /api/v1/products/{id}
//! DELETE /api/v1/products/{id}
//! GET    /api/v1/products/{id}/history
//! POST   /api/v1/products/{id}/assign
//! POST   /api/v1/products/{id}/return
//! ```
//!
//! Mutations answer with a `TransactionOutcome`; its failure code picks the
//! HTTP status.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, delete, get, patch, post, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::AssignRequest;
use crate::domain::{
    AssetType, Error, ProductDraft, ProductId, ProductPatch, TransactionId, TransactionOutcome,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::outcome_response;
use crate::inbound::http::schemas::{HistoryLogResponse, ProductResponse, collect};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, double_option, missing_field_error, normalise_search, parse_id,
};

const PRODUCT_ID: FieldName = FieldName::new("productId");
const EMPLOYEE_ID: FieldName = FieldName::new("employeeId");
const TRANSACTION_ID: FieldName = FieldName::new("transactionId");

/// Optional free-text filter.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Case-insensitive match on title, category or serial number.
    pub search: Option<String>,
}

/// Body of `POST /api/v1/products`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub quantity: u32,
    #[schema(value_type = String, example = "3500.00")]
    pub value: Decimal,
    pub asset_type: AssetType,
    pub serial_number: Option<String>,
    pub image_url: Option<String>,
    /// Recorded on the creation log.
    pub admin_name: Option<String>,
}

impl CreateProductRequest {
    fn into_parts(self) -> (ProductDraft, Option<String>) {
        let draft = ProductDraft {
            title: self.title,
            description: self.description,
            category: self.category,
            quantity: self.quantity,
            value: self.value,
            asset_type: self.asset_type,
            serial_number: self.serial_number,
            image_url: self.image_url,
        };
        (draft, self.admin_name)
    }
}

/// Body of `PATCH /api/v1/products/{id}`. Absent fields are left alone;
/// `null` clears the optional text fields.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<u32>,
    #[schema(value_type = Option<String>)]
    pub value: Option<Decimal>,
    pub asset_type: Option<AssetType>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub serial_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(body: UpdateProductRequest) -> Self {
        Self {
            title: body.title,
            description: body.description,
            category: body.category,
            quantity: body.quantity,
            value: body.value,
            asset_type: body.asset_type,
            serial_number: body.serial_number,
            image_url: body.image_url,
        }
    }
}

/// Body of `POST /api/v1/products/{id}/assign`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignBody {
    pub employee_id: Option<String>,
    /// Units to hand over; defaults to one.
    pub quantity: Option<u32>,
    /// Custody contract correlation id; generated when absent.
    pub transaction_id: Option<String>,
    pub protocol_signature: Option<String>,
    pub admin_name: Option<String>,
}

fn parse_assign(product_id: ProductId, body: AssignBody) -> Result<AssignRequest, Error> {
    let employee_id = body
        .employee_id
        .ok_or_else(|| missing_field_error(EMPLOYEE_ID))
        .and_then(|raw| parse_id(&raw, EMPLOYEE_ID))?;
    let transaction_id = body
        .transaction_id
        .map(|raw| parse_id::<TransactionId>(&raw, TRANSACTION_ID))
        .transpose()?;
    Ok(AssignRequest {
        product_id,
        employee_id,
        quantity: body.quantity.unwrap_or(1),
        transaction_id,
        protocol_signature: body.protocol_signature,
        admin_name: body.admin_name,
    })
}

/// List products that have not been deleted.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(SearchQuery),
    responses(
        (status = 200, description = "Active products ordered by title", body = [ProductResponse]),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["products"],
    operation_id = "listProducts"
)]
#[get("/products")]
pub async fn list_products(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<Vec<ProductResponse>>> {
    let search = normalise_search(query.into_inner().search);
    let products = state.inventory_query.active_products(search).await?;
    Ok(web::Json(collect(products)))
}

/// Register a product in stock.
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = TransactionOutcome),
        (status = 400, description = "Invalid product", body = TransactionOutcome),
        (status = 500, description = "Write failed", body = TransactionOutcome)
    ),
    tags = ["products"],
    operation_id = "createProduct"
)]
#[post("/products")]
pub async fn create_product(
    state: web::Data<HttpState>,
    payload: web::Json<CreateProductRequest>,
) -> HttpResponse {
    let (draft, admin_name) = payload.into_inner().into_parts();
    let outcome = state.inventory.create_product(draft, admin_name).await;
    outcome_response(outcome, StatusCode::CREATED)
}

/// Fetch one product, including soft-deleted rows.
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = ProductResponse),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Unknown product", body = Error)
    ),
    tags = ["products"],
    operation_id = "getProduct"
)]
#[get("/products/{id}")]
pub async fn get_product(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProductResponse>> {
    let id = parse_id(&path, PRODUCT_ID)?;
    let product = state.inventory_query.product(id).await?;
    Ok(web::Json(product.into()))
}

/// Patch descriptive fields of a live product.
#[utoipa::path(
    patch,
    path = "/api/v1/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = TransactionOutcome),
        (status = 400, description = "Invalid patch", body = TransactionOutcome),
        (status = 404, description = "Unknown or deleted product", body = TransactionOutcome)
    ),
    tags = ["products"],
    operation_id = "updateProduct"
)]
#[patch("/products/{id}")]
pub async fn update_product(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateProductRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path, PRODUCT_ID)?;
    let outcome = state
        .inventory
        .update_product(id, payload.into_inner().into())
        .await;
    Ok(outcome_response(outcome, StatusCode::OK))
}

/// Soft-delete a product.
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product marked deleted", body = TransactionOutcome),
        (status = 404, description = "Unknown product", body = TransactionOutcome),
        (status = 409, description = "Product is assigned", body = TransactionOutcome)
    ),
    tags = ["products"],
    operation_id = "deleteProduct"
)]
#[delete("/products/{id}")]
pub async fn delete_product(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path, PRODUCT_ID)?;
    let outcome = state.inventory.delete_product(id).await;
    Ok(outcome_response(outcome, StatusCode::OK))
}

/// Chronological history of one product.
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}/history",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Logs oldest first", body = [HistoryLogResponse]),
        (status = 400, description = "Malformed id", body = Error)
    ),
    tags = ["products"],
    operation_id = "getProductHistory"
)]
#[get("/products/{id}/history")]
pub async fn product_history(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<HistoryLogResponse>>> {
    let id = parse_id(&path, PRODUCT_ID)?;
    let logs = state.inventory_query.product_history(id).await?;
    Ok(web::Json(collect(logs)))
}

/// Hand units of a product to an employee.
#[utoipa::path(
    post,
    path = "/api/v1/products/{id}/assign",
    params(("id" = String, Path, description = "Product id")),
    request_body = AssignBody,
    responses(
        (status = 200, description = "Assignment recorded", body = TransactionOutcome),
        (status = 404, description = "Unknown product or employee", body = TransactionOutcome),
        (status = 409, description = "Product not in stock", body = TransactionOutcome),
        (status = 422, description = "Insufficient quantity", body = TransactionOutcome)
    ),
    tags = ["products"],
    operation_id = "assignProduct"
)]
#[post("/products/{id}/assign")]
pub async fn assign_product(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<AssignBody>,
) -> ApiResult<HttpResponse> {
    let product_id = parse_id(&path, PRODUCT_ID)?;
    let request = parse_assign(product_id, payload.into_inner())?;
    let outcome = state.inventory.assign(request).await;
    Ok(outcome_response(outcome, StatusCode::OK))
}

/// Return an assigned row to stock, merging with a matching stock row.
#[utoipa::path(
    post,
    path = "/api/v1/products/{id}/return",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Return recorded", body = TransactionOutcome),
        (status = 404, description = "Unknown product", body = TransactionOutcome),
        (status = 409, description = "Product not assigned", body = TransactionOutcome)
    ),
    tags = ["products"],
    operation_id = "returnProduct"
)]
#[post("/products/{id}/return")]
pub async fn return_product(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path, PRODUCT_ID)?;
    let outcome = state.inventory.return_item(id).await;
    Ok(outcome_response(outcome, StatusCode::OK))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Custody, EmployeeId, Product, TransactionReceipt};
    use crate::inbound::http::test_utils::{TestPorts, test_app};
    use actix_web::test as actix_test;
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn laptop(id: ProductId) -> Product {
        Product {
            id,
            title: "Laptop".to_owned(),
            description: String::new(),
            category: "IT".to_owned(),
            quantity: 2,
            value: Decimal::new(100, 0),
            asset_type: AssetType::Permanent,
            serial_number: None,
            image_url: None,
            custody: Custody::InStock,
        }
    }

    async fn call(ports: TestPorts, request: actix_test::TestRequest) -> (StatusCode, Value) {
        let app = actix_test::init_service(test_app(ports.into_state())).await;
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, value)
    }

    #[rstest]
    #[actix_rt::test]
    async fn list_passes_trimmed_search_through() {
        let id = ProductId::random();
        let mut ports = TestPorts::default();
        ports
            .inventory_query
            .expect_active_products()
            .with(eq(Some("lap".to_owned())))
            .times(1)
            .return_once(move |_| Ok(vec![laptop(id)]));

        let (status, body) = call(
            ports,
            actix_test::TestRequest::get().uri("/api/v1/products?search=lap"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["id"], json!(id.to_string()));
        assert_eq!(body[0]["status"], "IN_STOCK");
    }

    #[rstest]
    #[actix_rt::test]
    async fn blank_search_lists_everything() {
        let mut ports = TestPorts::default();
        ports
            .inventory_query
            .expect_active_products()
            .with(eq(None))
            .times(1)
            .return_once(|_| Ok(Vec::new()));

        let (status, _) = call(
            ports,
            actix_test::TestRequest::get().uri("/api/v1/products?search=%20"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
    }

    #[rstest]
    #[actix_rt::test]
    async fn create_answers_201_with_outcome() {
        let id = ProductId::random();
        let mut ports = TestPorts::default();
        ports
            .inventory
            .expect_create_product()
            .withf(|draft, admin| draft.title == "Mouse" && admin.as_deref() == Some("Root"))
            .times(1)
            .return_once(move |_, _| {
                TransactionReceipt::new("Produto criado").with_product(id).into()
            });

        let (status, body) = call(
            ports,
            actix_test::TestRequest::post()
                .uri("/api/v1/products")
                .set_json(json!({
                    "title": "Mouse",
                    "category": "IT",
                    "quantity": 5,
                    "value": "19.90",
                    "assetType": "CONSUMABLE",
                    "adminName": "Root"
                })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["productId"], json!(id.to_string()));
    }

    #[rstest]
    #[actix_rt::test]
    async fn malformed_path_id_is_rejected_before_the_port() {
        let (status, body) = call(
            TestPorts::default(),
            actix_test::TestRequest::get().uri("/api/v1/products/not-a-uuid"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], "productId");
        assert!(body["traceId"].is_string());
    }

    #[rstest]
    #[actix_rt::test]
    async fn insufficient_quantity_maps_to_422() {
        let product_id = ProductId::random();
        let employee_id = EmployeeId::random();
        let mut ports = TestPorts::default();
        ports
            .inventory
            .expect_assign()
            .withf(move |req| {
                req.product_id == product_id
                    && req.employee_id == employee_id
                    && req.quantity == 5
                    && req.transaction_id.is_none()
            })
            .times(1)
            .return_once(|_| {
                TransactionOutcome::failed(&Error::insufficient_quantity(
                    "Quantidade insuficiente. Disponível: 2",
                ))
            });

        let (status, body) = call(
            ports,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/products/{product_id}/assign"))
                .set_json(json!({ "employeeId": employee_id.to_string(), "quantity": 5 })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "insufficient_quantity");
    }

    #[rstest]
    #[actix_rt::test]
    async fn assign_requires_employee_id() {
        let product_id = ProductId::random();

        let (status, body) = call(
            TestPorts::default(),
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/products/{product_id}/assign"))
                .set_json(json!({ "quantity": 1 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["code"], "missing_field");
    }

    #[rstest]
    fn patch_body_distinguishes_null_from_absent() {
        let body: UpdateProductRequest =
            serde_json::from_value(json!({ "serialNumber": null, "quantity": 3 }))
                .expect("patch body");

        let patch = ProductPatch::from(body);

        assert_eq!(patch.serial_number, Some(None));
        assert_eq!(patch.image_url, None);
        assert_eq!(patch.quantity, Some(3));
    }

    #[rstest]
    #[actix_rt::test]
    async fn return_forwards_product_id() {
        let id = ProductId::random();
        let mut ports = TestPorts::default();
        ports
            .inventory
            .expect_return_item()
            .with(eq(id))
            .times(1)
            .return_once(move |_| {
                TransactionReceipt::new("Item devolvido ao estoque")
                    .with_product(id)
                    .into()
            });

        let (status, body) = call(
            ports,
            actix_test::TestRequest::post().uri(&format!("/api/v1/products/{id}/return")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }
}
