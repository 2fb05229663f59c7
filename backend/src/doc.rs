//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler, the health probes and the
//! response schemas. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` exports it for client generation.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, TransactionOutcome};
use crate::inbound::http::schemas::{
    AuditEntryResponse, CategoryResponse, ContractResponse, EmployeeResponse,
    HistoryEntryResponse, HistoryLogResponse, LegacyImportResponse, ProductResponse,
    SnapshotResponse,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory ledger API",
        description = "Asset custody ledger with history, contracts and custody terms."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::history::snapshot,
        crate::inbound::http::history::global_history,
        crate::inbound::http::history::audit_trail,
        crate::inbound::http::products::list_products,
        crate::inbound::http::products::create_product,
        crate::inbound::http::products::get_product,
        crate::inbound::http::products::update_product,
        crate::inbound::http::products::delete_product,
        crate::inbound::http::products::product_history,
        crate::inbound::http::products::assign_product,
        crate::inbound::http::products::return_product,
        crate::inbound::http::employees::list_employees,
        crate::inbound::http::employees::create_employee,
        crate::inbound::http::employees::find_employee_by_email,
        crate::inbound::http::employees::update_employee,
        crate::inbound::http::employees::delete_employee,
        crate::inbound::http::employees::employee_assets,
        crate::inbound::http::categories::list_categories,
        crate::inbound::http::categories::create_category,
        crate::inbound::http::contracts::list_contracts,
        crate::inbound::http::contracts::upload_contract,
        crate::inbound::http::contracts::import_legacy_contract,
        crate::inbound::http::contracts::delete_contract,
        crate::inbound::http::terms::dispatch_term,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        TransactionOutcome,
        ProductResponse,
        EmployeeResponse,
        CategoryResponse,
        HistoryLogResponse,
        HistoryEntryResponse,
        AuditEntryResponse,
        ContractResponse,
        LegacyImportResponse,
        SnapshotResponse,
    )),
    tags(
        (name = "products", description = "Product rows and custody transactions"),
        (name = "employees", description = "Employee directory"),
        (name = "categories", description = "Product categories"),
        (name = "history", description = "Ledger snapshot, feed and audit trail"),
        (name = "contracts", description = "Signed custody contract archive"),
        (name = "terms", description = "Custody terms sent for signature"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn schema_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.expect("components").schemas;
        match schemas.get(name) {
            Some(RefOr::T(Schema::Object(obj))) => obj.properties.keys().cloned().collect(),
            other => panic!("expected object schema for {name}, got {other:?}"),
        }
    }

    #[rstest]
    #[case("Error", &["code", "message", "traceId", "details"])]
    #[case("TransactionOutcome", &["success", "message", "code", "productId"])]
    #[case("ProductResponse", &["status", "assignedToEmployeeId", "currentTransactionId"])]
    #[case("ContractResponse", &["type", "fileUrl", "transactionId"])]
    fn schemas_expose_camel_case_fields(#[case] name: &str, #[case] fields: &[&str]) {
        let present = schema_fields(name);
        for field in fields {
            assert!(
                present.iter().any(|p| p == field),
                "{name} should have field '{field}'"
            );
        }
    }

    #[rstest]
    #[case("/api/v1/products/{id}/assign")]
    #[case("/api/v1/products/{id}/return")]
    #[case("/api/v1/terms")]
    #[case("/api/v1/contracts")]
    #[case("/health/ready")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "{path} missing");
    }
}
