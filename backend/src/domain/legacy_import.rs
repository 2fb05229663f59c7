//! Registering an item that is already in an employee's custody.
//!
//! Paper contracts signed before the ledger existed are imported together
//! with the single unit they cover: the row is born `ASSIGNED` and its
//! history opens with `CREATED` followed by `ASSIGNED`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::product_lifecycle::map_validation_error;
use super::{
    AssetType, Custody, Employee, Error, HistoryAction, HistoryLog, Holder, LedgerBatch,
    LedgerWrite, Product, ProductDraft, TransactionId,
};

/// Descriptive fields of the imported item. Quantity is always one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyItem {
    pub title: String,
    pub category: String,
    pub serial_number: Option<String>,
    pub value: Decimal,
    pub asset_type: AssetType,
}

/// Row, custody transaction and writes produced by [`plan_legacy_import`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyImportPlan {
    pub product: Product,
    pub transaction_id: TransactionId,
    pub batch: LedgerBatch,
}

/// Plan the insert of an already-assigned unit and its opening history.
///
/// The caller appends the contract row once the file is stored, so the
/// whole import commits as one batch.
pub fn plan_legacy_import(
    item: LegacyItem,
    employee: &Employee,
    admin_name: Option<String>,
    now: DateTime<Utc>,
) -> Result<LegacyImportPlan, Error> {
    let draft = ProductDraft {
        title: item.title,
        description: String::new(),
        category: item.category,
        quantity: 1,
        value: item.value,
        asset_type: item.asset_type,
        serial_number: item.serial_number,
        image_url: None,
    };
    let mut product = draft.into_product().map_err(map_validation_error)?;
    let transaction_id = TransactionId::random();
    product.custody = Custody::Assigned(Holder {
        employee_id: employee.id,
        employee_name: employee.name.clone(),
        transaction_id: Some(transaction_id),
    });

    let batch = LedgerBatch::new()
        .with(LedgerWrite::InsertProduct(product.clone()))
        .with(LedgerWrite::AppendLog(
            HistoryLog::new(HistoryAction::Created, product.id, now).with_admin(admin_name.clone()),
        ))
        .with(LedgerWrite::AppendLog(
            HistoryLog::new(HistoryAction::Assigned, product.id, now)
                .with_employee(employee.id, employee.name.clone())
                .with_transaction(Some(transaction_id))
                .with_admin(admin_name),
        ));
    Ok(LegacyImportPlan {
        product,
        transaction_id,
        batch,
    })
}
