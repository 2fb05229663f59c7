//! Response payloads shared across HTTP handlers.
//!
//! Domain records stay free of wire concerns; these DTOs flatten them into
//! the camelCase JSON the frontend consumes and carry the OpenAPI schemas.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::history_projection::{ActionPresentation, AuditEntry, HistoryEntry};
use crate::domain::ports::{InventorySnapshot, LegacyImport};
use crate::domain::{
    AssetType, Category, CategoryId, ContractId, ContractKind, Employee, EmployeeId,
    HistoryAction, HistoryLog, HistoryLogId, Product, ProductId, ProductStatus, SignedContract,
    TransactionId,
};

/// A product row with its custody flattened into status and holder fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: ProductId,
    #[schema(example = "Notebook Dell")]
    pub title: String,
    pub description: String,
    #[schema(example = "TI")]
    pub category: String,
    pub quantity: u32,
    #[schema(value_type = String, example = "3500.00")]
    pub value: Decimal,
    pub asset_type: AssetType,
    pub serial_number: Option<String>,
    pub image_url: Option<String>,
    pub status: ProductStatus,
    pub assigned_to_employee_id: Option<EmployeeId>,
    pub assigned_to_employee_name: Option<String>,
    pub current_transaction_id: Option<TransactionId>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        let status = product.status();
        let holder = product.custody.holder().cloned();
        Self {
            id: product.id,
            title: product.title,
            description: product.description,
            category: product.category,
            quantity: product.quantity,
            value: product.value,
            asset_type: product.asset_type,
            serial_number: product.serial_number,
            image_url: product.image_url,
            status,
            assigned_to_employee_id: holder.as_ref().map(|h| h.employee_id),
            current_transaction_id: holder.as_ref().and_then(|h| h.transaction_id),
            assigned_to_employee_name: holder.map(|h| h.employee_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub id: EmployeeId,
    pub name: String,
    pub cpf: String,
    pub sector: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id,
            name: employee.name,
            cpf: employee.cpf,
            sector: employee.sector,
            email: employee.email,
            phone: employee.phone,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: CategoryId,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

/// One immutable ledger event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryLogResponse {
    pub id: HistoryLogId,
    pub date: DateTime<Utc>,
    pub action: HistoryAction,
    pub product_id: Option<ProductId>,
    pub employee_id: Option<EmployeeId>,
    pub employee_name: Option<String>,
    pub transaction_id: Option<TransactionId>,
    pub protocol_signature: Option<String>,
    pub admin_name: Option<String>,
}

impl From<HistoryLog> for HistoryLogResponse {
    fn from(log: HistoryLog) -> Self {
        Self {
            id: log.id,
            date: log.date,
            action: log.action,
            product_id: log.product_id,
            employee_id: log.employee_id,
            employee_name: log.employee_name,
            transaction_id: log.transaction_id,
            protocol_signature: log.protocol_signature,
            admin_name: log.admin_name,
        }
    }
}

/// A ledger event with its display attributes.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryResponse {
    pub log: HistoryLogResponse,
    pub presentation: ActionPresentation,
}

impl From<HistoryEntry> for HistoryEntryResponse {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            log: entry.log.into(),
            presentation: entry.presentation,
        }
    }
}

/// Audit row: a ledger event plus the title of the product it touched.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntryResponse {
    pub log: HistoryLogResponse,
    pub presentation: ActionPresentation,
    #[schema(example = "Produto Deletado/Desconhecido")]
    pub product_title: String,
}

impl From<AuditEntry> for AuditEntryResponse {
    fn from(audit: AuditEntry) -> Self {
        Self {
            log: audit.entry.log.into(),
            presentation: audit.entry.presentation,
            product_title: audit.product_title,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractResponse {
    pub id: ContractId,
    pub employee_id: EmployeeId,
    pub product_id: ProductId,
    pub transaction_id: Option<TransactionId>,
    #[serde(rename = "type")]
    pub kind: ContractKind,
    pub file_path: String,
    pub file_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<SignedContract> for ContractResponse {
    fn from(contract: SignedContract) -> Self {
        Self {
            id: contract.id,
            employee_id: contract.employee_id,
            product_id: contract.product_id,
            transaction_id: contract.transaction_id,
            kind: contract.kind,
            file_path: contract.file_path,
            file_url: contract.file_url,
            created_at: contract.created_at,
        }
    }
}

/// Rows created by a legacy contract import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LegacyImportResponse {
    pub product: ProductResponse,
    pub contract: ContractResponse,
}

impl From<LegacyImport> for LegacyImportResponse {
    fn from(import: LegacyImport) -> Self {
        Self {
            product: import.product.into(),
            contract: import.contract.into(),
        }
    }
}

/// Everything the dashboard renders after a mutation.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotResponse {
    pub products: Vec<ProductResponse>,
    pub employees: Vec<EmployeeResponse>,
    pub history: Vec<HistoryEntryResponse>,
    pub categories: Vec<CategoryResponse>,
}

impl From<InventorySnapshot> for SnapshotResponse {
    fn from(snapshot: InventorySnapshot) -> Self {
        Self {
            products: collect(snapshot.products),
            employees: collect(snapshot.employees),
            history: collect(snapshot.history),
            categories: collect(snapshot.categories),
        }
    }
}

/// Convert every element of a domain list into its response DTO.
pub(crate) fn collect<T, R: From<T>>(items: Vec<T>) -> Vec<R> {
    items.into_iter().map(R::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Custody, Holder};
    use rstest::rstest;
    use serde_json::json;

    fn laptop(custody: Custody) -> Product {
        Product {
            id: ProductId::random(),
            title: "Laptop".to_owned(),
            description: String::new(),
            category: "IT".to_owned(),
            quantity: 1,
            value: Decimal::new(350_000, 2),
            asset_type: AssetType::Permanent,
            serial_number: None,
            image_url: None,
            custody,
        }
    }

    #[rstest]
    fn assigned_product_exposes_holder_columns() {
        let employee_id = EmployeeId::random();
        let transaction_id = TransactionId::random();
        let product = laptop(Custody::Assigned(Holder {
            employee_id,
            employee_name: "Ana".to_owned(),
            transaction_id: Some(transaction_id),
        }));

        let value = serde_json::to_value(ProductResponse::from(product)).expect("serialise");

        assert_eq!(value["status"], "ASSIGNED");
        assert_eq!(value["assignedToEmployeeId"], json!(employee_id.to_string()));
        assert_eq!(value["assignedToEmployeeName"], "Ana");
        assert_eq!(value["currentTransactionId"], json!(transaction_id.to_string()));
        assert_eq!(value["value"], "3500.00");
        assert_eq!(value["assetType"], "PERMANENT");
    }

    #[rstest]
    fn stock_product_has_null_holder() {
        let value =
            serde_json::to_value(ProductResponse::from(laptop(Custody::InStock))).expect("json");

        assert_eq!(value["status"], "IN_STOCK");
        assert!(value["assignedToEmployeeId"].is_null());
        assert!(value["currentTransactionId"].is_null());
    }

    #[rstest]
    fn history_entry_nests_log_and_presentation() {
        let product_id = ProductId::random();
        let log = HistoryLog::new(HistoryAction::Returned, product_id, Utc::now());

        let value = serde_json::to_value(HistoryEntryResponse::from(HistoryEntry::from(log)))
            .expect("serialise");

        assert_eq!(value["log"]["action"], "RETURNED");
        assert_eq!(value["log"]["productId"], json!(product_id.to_string()));
        assert_eq!(value["presentation"]["label"], "Devolução");
        assert_eq!(value["presentation"]["color"], "green");
    }
}
