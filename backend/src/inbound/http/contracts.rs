//! Signed contract archive HTTP handlers.
//!
//! ```text
//! GET    /api/v1/contracts
//! POST   /api/v1/contracts {"employeeId":"…","productIds":["…"],"type":"DELIVERY",
//!                           "fileName":"termo.pdf","contentType":"application/pdf",
//!                           "contentBase64":"JVBERi0…"}
//! POST   /api/v1/contracts/legacy {"employeeId":"…","product":{"title":"…",
//!                                  "category":"…","value":"…","assetType":"…"},
//!                                  "fileName":"…","contentType":"…","contentBase64":"…"}
//! DELETE /api/v1/contracts/{id}
//! ```
//!
//! Files travel base64-encoded inside JSON; the archive service checks the
//! decoded size and format.

use actix_web::{HttpResponse, delete, get, post, web};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{ArchiveContractRequest, LegacyImportRequest};
use crate::domain::{AssetType, ContractKind, Error, LegacyItem};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ContractResponse, LegacyImportResponse, collect};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_id_list};

const CONTRACT_ID: FieldName = FieldName::new("contractId");
const EMPLOYEE_ID: FieldName = FieldName::new("employeeId");
const PRODUCT_IDS: FieldName = FieldName::new("productIds");

/// Body of `POST /api/v1/contracts`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadContractRequest {
    pub employee_id: String,
    /// One contract row is archived per product.
    pub product_ids: Vec<String>,
    #[serde(rename = "type")]
    pub kind: ContractKind,
    #[schema(example = "termo.pdf")]
    pub file_name: String,
    #[schema(example = "application/pdf")]
    pub content_type: String,
    pub content_base64: String,
}

/// Item described on a legacy contract; imported as a single unit.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LegacyItemBody {
    #[schema(example = "Notebook Dell G15")]
    pub title: String,
    pub category: String,
    pub serial_number: Option<String>,
    #[schema(value_type = String, example = "6500.00")]
    pub value: Decimal,
    pub asset_type: AssetType,
}

/// Body of `POST /api/v1/contracts/legacy`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LegacyImportBody {
    pub employee_id: String,
    pub product: LegacyItemBody,
    pub admin_name: Option<String>,
    pub file_name: String,
    pub content_type: String,
    pub content_base64: String,
}

fn invalid_base64() -> Error {
    Error::invalid_request("contentBase64 must be valid base64")
        .with_details(json!({ "field": "contentBase64", "code": "invalid_base64" }))
}

fn decode_file(content_base64: &str) -> Result<Vec<u8>, Error> {
    STANDARD
        .decode(content_base64.trim())
        .map_err(|_| invalid_base64())
}

fn parse_upload(body: UploadContractRequest) -> Result<ArchiveContractRequest, Error> {
    let employee_id = parse_id(&body.employee_id, EMPLOYEE_ID)?;
    let product_ids = parse_id_list(&body.product_ids, PRODUCT_IDS)?;
    let bytes = decode_file(&body.content_base64)?;
    Ok(ArchiveContractRequest {
        employee_id,
        product_ids,
        kind: body.kind,
        file_name: body.file_name,
        content_type: body.content_type,
        bytes,
    })
}

fn parse_legacy(body: LegacyImportBody) -> Result<LegacyImportRequest, Error> {
    let employee_id = parse_id(&body.employee_id, EMPLOYEE_ID)?;
    let bytes = decode_file(&body.content_base64)?;
    let item = body.product;
    Ok(LegacyImportRequest {
        employee_id,
        item: LegacyItem {
            title: item.title,
            category: item.category,
            serial_number: item.serial_number,
            value: item.value,
            asset_type: item.asset_type,
        },
        admin_name: body.admin_name,
        file_name: body.file_name,
        content_type: body.content_type,
        bytes,
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/contracts",
    responses(
        (status = 200, description = "Contracts, newest first", body = [ContractResponse]),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["contracts"],
    operation_id = "listContracts"
)]
#[get("/contracts")]
pub async fn list_contracts(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ContractResponse>>> {
    let contracts = state.contracts.list().await?;
    Ok(web::Json(collect(contracts)))
}

/// Store a signed custody file and link it to each product.
#[utoipa::path(
    post,
    path = "/api/v1/contracts",
    request_body = UploadContractRequest,
    responses(
        (status = 201, description = "Contracts archived", body = [ContractResponse]),
        (status = 400, description = "Bad ids, encoding, size or format", body = Error),
        (status = 404, description = "Unknown employee or product", body = Error),
        (status = 503, description = "Blob storage unavailable", body = Error)
    ),
    tags = ["contracts"],
    operation_id = "uploadContract"
)]
#[post("/contracts")]
pub async fn upload_contract(
    state: web::Data<HttpState>,
    payload: web::Json<UploadContractRequest>,
) -> ApiResult<HttpResponse> {
    let request = parse_upload(payload.into_inner())?;
    let contracts = state.contracts.archive(request).await?;
    Ok(HttpResponse::Created().json(collect::<_, ContractResponse>(contracts)))
}

/// Register an item an employee already holds and attach its old contract.
#[utoipa::path(
    post,
    path = "/api/v1/contracts/legacy",
    request_body = LegacyImportBody,
    responses(
        (status = 201, description = "Item and contract recorded", body = LegacyImportResponse),
        (status = 400, description = "Bad id, item fields, encoding, size or format", body = Error),
        (status = 404, description = "Unknown employee", body = Error),
        (status = 503, description = "Blob storage unavailable", body = Error)
    ),
    tags = ["contracts"],
    operation_id = "importLegacyContract"
)]
#[post("/contracts/legacy")]
pub async fn import_legacy_contract(
    state: web::Data<HttpState>,
    payload: web::Json<LegacyImportBody>,
) -> ApiResult<HttpResponse> {
    let request = parse_legacy(payload.into_inner())?;
    let imported = state.contracts.import_legacy(request).await?;
    Ok(HttpResponse::Created().json(LegacyImportResponse::from(imported)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/contracts/{id}",
    params(("id" = String, Path, description = "Contract id")),
    responses(
        (status = 204, description = "Contract removed"),
        (status = 404, description = "Unknown contract", body = Error)
    ),
    tags = ["contracts"],
    operation_id = "deleteContract"
)]
#[delete("/contracts/{id}")]
pub async fn delete_contract(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path, CONTRACT_ID)?;
    state.contracts.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}
