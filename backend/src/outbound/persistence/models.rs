//! Internal Diesel row structs and their domain conversions.
//!
//! These types never leave the persistence layer. Reading a row that fails
//! to decode (unknown enum text, inconsistent custody columns, negative
//! quantity) is reported as a query error rather than silently patched.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::ports::LedgerStoreError;
use crate::domain::{
    Category, CategoryId, ContractId, Custody, Employee, EmployeeId, HistoryLog, HistoryLogId,
    Product, ProductId, SignedContract, TransactionId,
};

use super::schema::{categories, employees, history_logs, products, signed_contracts};

fn decode_error(table: &str, id: Uuid, err: impl std::fmt::Display) -> LedgerStoreError {
    LedgerStoreError::query(format!("undecodable {table} row {id}: {err}"))
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProductRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub quantity: i32,
    pub value: Decimal,
    pub asset_type: String,
    pub serial_number: Option<String>,
    pub image_url: Option<String>,
    pub status: String,
    pub assigned_to_id: Option<Uuid>,
    pub assigned_to_name: Option<String>,
    pub current_transaction_id: Option<Uuid>,
}

impl ProductRow {
    pub(crate) fn from_domain(product: &Product) -> Result<Self, LedgerStoreError> {
        let quantity = i32::try_from(product.quantity).map_err(|_| {
            LedgerStoreError::constraint(format!(
                "quantity {} of {} exceeds the column range",
                product.quantity, product.id
            ))
        })?;
        let holder = product.holder();
        Ok(Self {
            id: *product.id.as_uuid(),
            title: product.title.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            quantity,
            value: product.value,
            asset_type: product.asset_type.as_str().to_owned(),
            serial_number: product.serial_number.clone(),
            image_url: product.image_url.clone(),
            status: product.status().as_str().to_owned(),
            assigned_to_id: holder.map(|h| *h.employee_id.as_uuid()),
            assigned_to_name: holder.map(|h| h.employee_name.clone()),
            current_transaction_id: holder
                .and_then(|h| h.transaction_id)
                .map(|tx| *tx.as_uuid()),
        })
    }

    pub(crate) fn into_domain(self) -> Result<Product, LedgerStoreError> {
        let id = self.id;
        let quantity =
            u32::try_from(self.quantity).map_err(|err| decode_error("products", id, err))?;
        let asset_type = self
            .asset_type
            .parse()
            .map_err(|err| decode_error("products", id, err))?;
        let status = self
            .status
            .parse()
            .map_err(|err| decode_error("products", id, err))?;
        let custody = Custody::from_parts(
            status,
            self.assigned_to_id.map(EmployeeId::from_uuid),
            self.assigned_to_name,
            self.current_transaction_id.map(TransactionId::from_uuid),
        )
        .map_err(|err| decode_error("products", id, err))?;
        Ok(Product {
            id: ProductId::from_uuid(id),
            title: self.title,
            description: self.description,
            category: self.category,
            quantity,
            value: self.value,
            asset_type,
            serial_number: self.serial_number,
            image_url: self.image_url,
            custody,
        })
    }
}

// ---------------------------------------------------------------------------
// Employees
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct EmployeeRow {
    pub id: Uuid,
    pub name: String,
    pub cpf: String,
    pub sector: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<&Employee> for EmployeeRow {
    fn from(employee: &Employee) -> Self {
        Self {
            id: *employee.id.as_uuid(),
            name: employee.name.clone(),
            cpf: employee.cpf.clone(),
            sector: employee.sector.clone(),
            email: employee.email.clone(),
            phone: employee.phone.clone(),
        }
    }
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Self {
            id: EmployeeId::from_uuid(row.id),
            name: row.name,
            cpf: row.cpf,
            sector: row.sector,
            email: row.email,
            phone: row.phone,
        }
    }
}

// ---------------------------------------------------------------------------
// History logs
// ---------------------------------------------------------------------------

/// Read side; `seq` is assigned by the database and only used for ordering.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = history_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HistoryLogRow {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub action: String,
    pub date: DateTime<Utc>,
    pub employee_id: Option<Uuid>,
    pub employee_name: Option<String>,
    pub transaction_id: Option<Uuid>,
    pub protocol_signature: Option<String>,
    pub admin_name: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = history_logs)]
pub(crate) struct NewHistoryLogRow<'a> {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub action: &'static str,
    pub date: DateTime<Utc>,
    pub employee_id: Option<Uuid>,
    pub employee_name: Option<&'a str>,
    pub transaction_id: Option<Uuid>,
    pub protocol_signature: Option<&'a str>,
    pub admin_name: Option<&'a str>,
}

impl<'a> From<&'a HistoryLog> for NewHistoryLogRow<'a> {
    fn from(log: &'a HistoryLog) -> Self {
        Self {
            id: *log.id.as_uuid(),
            product_id: log.product_id.map(|id| *id.as_uuid()),
            action: log.action.as_str(),
            date: log.date,
            employee_id: log.employee_id.map(|id| *id.as_uuid()),
            employee_name: log.employee_name.as_deref(),
            transaction_id: log.transaction_id.map(|id| *id.as_uuid()),
            protocol_signature: log.protocol_signature.as_deref(),
            admin_name: log.admin_name.as_deref(),
        }
    }
}

impl HistoryLogRow {
    pub(crate) fn into_domain(self) -> Result<HistoryLog, LedgerStoreError> {
        let action = self
            .action
            .parse()
            .map_err(|err| decode_error("history_logs", self.id, err))?;
        Ok(HistoryLog {
            id: HistoryLogId::from_uuid(self.id),
            date: self.date,
            action,
            product_id: self.product_id.map(ProductId::from_uuid),
            employee_id: self.employee_id.map(EmployeeId::from_uuid),
            employee_name: self.employee_name,
            transaction_id: self.transaction_id.map(TransactionId::from_uuid),
            protocol_signature: self.protocol_signature,
            admin_name: self.admin_name,
        })
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CategoryRow {
    pub id: Uuid,
    pub name: String,
}

impl From<&Category> for CategoryRow {
    fn from(category: &Category) -> Self {
        Self {
            id: *category.id.as_uuid(),
            name: category.name.clone(),
        }
    }
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::from_uuid(row.id),
            name: row.name,
        }
    }
}

// ---------------------------------------------------------------------------
// Signed contracts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = signed_contracts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SignedContractRow {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub product_id: Uuid,
    pub transaction_id: Option<Uuid>,
    pub kind: String,
    pub file_path: String,
    pub file_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<&SignedContract> for SignedContractRow {
    fn from(contract: &SignedContract) -> Self {
        Self {
            id: *contract.id.as_uuid(),
            employee_id: *contract.employee_id.as_uuid(),
            product_id: *contract.product_id.as_uuid(),
            transaction_id: contract.transaction_id.map(|id| *id.as_uuid()),
            kind: contract.kind.as_str().to_owned(),
            file_path: contract.file_path.clone(),
            file_url: contract.file_url.clone(),
            created_at: contract.created_at,
        }
    }
}

impl SignedContractRow {
    pub(crate) fn into_domain(self) -> Result<SignedContract, LedgerStoreError> {
        let kind = self
            .kind
            .parse()
            .map_err(|err| decode_error("signed_contracts", self.id, err))?;
        Ok(SignedContract {
            id: ContractId::from_uuid(self.id),
            employee_id: EmployeeId::from_uuid(self.employee_id),
            product_id: ProductId::from_uuid(self.product_id),
            transaction_id: self.transaction_id.map(TransactionId::from_uuid),
            kind,
            file_path: self.file_path,
            file_url: self.file_url,
            created_at: self.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssetType, Holder};
    use rstest::rstest;

    fn assigned() -> Product {
        Product {
            id: ProductId::random(),
            title: "Drill".to_owned(),
            description: "Cordless".to_owned(),
            category: "Tools".to_owned(),
            quantity: 2,
            value: Decimal::new(19990, 2),
            asset_type: AssetType::Permanent,
            serial_number: Some("SN-1".to_owned()),
            image_url: None,
            custody: Custody::Assigned(Holder {
                employee_id: EmployeeId::random(),
                employee_name: "Ana".to_owned(),
                transaction_id: Some(TransactionId::random()),
            }),
        }
    }

    #[rstest]
    fn product_rows_flatten_custody() {
        let product = assigned();
        let row = ProductRow::from_domain(&product).expect("row");
        assert_eq!(row.status, "ASSIGNED");
        assert_eq!(row.assigned_to_name.as_deref(), Some("Ana"));
        assert_eq!(row.into_domain().expect("decode"), product);
    }

    #[rstest]
    fn inconsistent_custody_columns_are_rejected() {
        let mut row = ProductRow::from_domain(&assigned()).expect("row");
        row.status = "IN_STOCK".to_owned();
        let err = row.into_domain().expect_err("holder on stock row");
        assert!(matches!(err, LedgerStoreError::Query { .. }));
    }

    #[rstest]
    #[case("RETIRED")]
    #[case("in_stock")]
    fn unknown_status_text_is_rejected(#[case] status: &str) {
        let mut row = ProductRow::from_domain(&assigned()).expect("row");
        row.status = status.to_owned();
        assert!(row.into_domain().is_err());
    }
}
