//! Product registration, descriptive edits and soft deletion.

use chrono::{DateTime, Utc};
use serde_json::json;

use super::{
    Custody, Error, HistoryAction, HistoryLog, LedgerBatch, LedgerWrite, Product, ProductDraft,
    ProductPatch, ProductStatus, ProductValidationError,
};

/// Actor name recorded on deletions of rows with a blank title.
pub const UNKNOWN_ITEM_TITLE: &str = "Unknown Item";

pub(crate) fn map_validation_error(error: ProductValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({ "field": error.field() }))
}

/// Validate a draft and plan the insert plus its `CREATED` entry.
pub fn plan_creation(
    draft: ProductDraft,
    admin_name: Option<String>,
    now: DateTime<Utc>,
) -> Result<(Product, LedgerBatch), Error> {
    let product = draft.into_product().map_err(map_validation_error)?;
    let log = HistoryLog::new(HistoryAction::Created, product.id, now).with_admin(admin_name);
    let batch = LedgerBatch::new()
        .with(LedgerWrite::InsertProduct(product.clone()))
        .with(LedgerWrite::AppendLog(log));
    Ok((product, batch))
}

/// Apply a descriptive patch to a live row.
pub fn plan_update(
    product: &Product,
    patch: ProductPatch,
) -> Result<(Product, LedgerBatch), Error> {
    if product.is_deleted() {
        return Err(Error::not_found(format!("product {} not found", product.id)));
    }
    if patch.is_empty() {
        return Err(Error::invalid_request("update must change at least one field"));
    }
    if patch.alters_stock() && product.status() != ProductStatus::InStock {
        return Err(Error::conflict(format!(
            "product {} is in custody; quantity and asset type are frozen",
            product.id
        ))
        .with_details(json!({ "status": product.status().as_str() })));
    }
    let updated = patch.apply_to(product).map_err(map_validation_error)?;
    let batch = LedgerBatch::new().with(LedgerWrite::UpdateProduct(updated.clone()));
    Ok((updated, batch))
}

/// Plan a soft delete: log first, then mark the row `DELETED`.
///
/// The `DELETED` entry carries the title in its actor-name field so the
/// audit trail stays readable after the row leaves every listing.
pub fn plan_deletion(product: &Product, now: DateTime<Utc>) -> Result<LedgerBatch, Error> {
    if product.is_deleted() {
        return Err(Error::not_found(format!("product {} not found", product.id)));
    }
    let title = match product.title.trim() {
        "" => UNKNOWN_ITEM_TITLE,
        title => title,
    };
    let mut deleted = product.clone();
    deleted.custody = Custody::Deleted;
    Ok(LedgerBatch::new()
        .with(LedgerWrite::AppendLog(
            HistoryLog::new(HistoryAction::Deleted, product.id, now).with_actor_name(title),
        ))
        .with(LedgerWrite::UpdateProduct(deleted)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssetType, EmployeeId, ErrorCode, Holder};
    use rstest::{fixture, rstest};
    use rust_decimal::Decimal;

    #[fixture]
    fn draft() -> ProductDraft {
        ProductDraft {
            title: "Monitor".to_owned(),
            description: "27 inch".to_owned(),
            category: "IT".to_owned(),
            quantity: 4,
            value: Decimal::new(1200, 0),
            asset_type: AssetType::Permanent,
            serial_number: None,
            image_url: None,
        }
    }

    #[rstest]
    fn creation_inserts_then_logs(draft: ProductDraft) {
        let (product, batch) = plan_creation(draft, None, Utc::now()).expect("plan");
        assert_eq!(batch.labels(), vec!["insert_product", "append_log"]);
        let LedgerWrite::AppendLog(log) = &batch.writes()[1] else {
            panic!("expected log");
        };
        assert_eq!(log.action, HistoryAction::Created);
        assert_eq!(log.product_id, Some(product.id));
    }

    #[rstest]
    fn creation_reports_field_on_validation_failure(mut draft: ProductDraft) {
        draft.quantity = 0;
        let err = plan_creation(draft, None, Utc::now()).expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details(), Some(&json!({ "field": "quantity" })));
    }

    #[rstest]
    fn deletion_logs_title_and_clears_holder(draft: ProductDraft) {
        let mut product = draft.into_product().expect("product");
        product.custody = Custody::Assigned(Holder {
            employee_id: EmployeeId::random(),
            employee_name: "Ana".to_owned(),
            transaction_id: None,
        });

        let batch = plan_deletion(&product, Utc::now()).expect("plan");

        assert_eq!(batch.labels(), vec!["append_log", "update_product"]);
        let LedgerWrite::AppendLog(log) = &batch.writes()[0] else {
            panic!("expected log");
        };
        assert_eq!(log.employee_name.as_deref(), Some("Monitor"));
        let LedgerWrite::UpdateProduct(deleted) = &batch.writes()[1] else {
            panic!("expected update");
        };
        assert_eq!(deleted.status(), ProductStatus::Deleted);
        assert!(deleted.holder().is_none());
    }

    #[rstest]
    fn deletion_falls_back_for_blank_titles(draft: ProductDraft) {
        let mut product = draft.into_product().expect("product");
        product.title = "  ".to_owned();
        let batch = plan_deletion(&product, Utc::now()).expect("plan");
        let LedgerWrite::AppendLog(log) = &batch.writes()[0] else {
            panic!("expected log");
        };
        assert_eq!(log.employee_name.as_deref(), Some(UNKNOWN_ITEM_TITLE));
    }

    #[rstest]
    fn deleted_rows_cannot_be_deleted_or_updated(draft: ProductDraft) {
        let mut product = draft.into_product().expect("product");
        product.custody = Custody::Deleted;
        assert_eq!(
            plan_deletion(&product, Utc::now()).expect_err("gone").code(),
            ErrorCode::NotFound
        );
        let patch = ProductPatch {
            title: Some("x".to_owned()),
            ..ProductPatch::default()
        };
        assert_eq!(
            plan_update(&product, patch).expect_err("gone").code(),
            ErrorCode::NotFound
        );
    }

    fn assigned(draft: ProductDraft) -> Product {
        let mut product = draft.into_product().expect("product");
        product.custody = Custody::Assigned(Holder {
            employee_id: EmployeeId::random(),
            employee_name: "Ana".to_owned(),
            transaction_id: None,
        });
        product
    }

    #[rstest]
    #[case(ProductPatch { quantity: Some(9), ..ProductPatch::default() })]
    #[case(ProductPatch { asset_type: Some(AssetType::Consumable), ..ProductPatch::default() })]
    fn rows_in_custody_keep_quantity_and_asset_type(
        draft: ProductDraft,
        #[case] patch: ProductPatch,
    ) {
        let err = plan_update(&assigned(draft), patch).expect_err("frozen");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    fn rows_in_custody_accept_descriptive_edits(draft: ProductDraft) {
        let product = assigned(draft);
        let patch = ProductPatch {
            description: Some("dented case".to_owned()),
            ..ProductPatch::default()
        };
        let (updated, _) = plan_update(&product, patch).expect("plan");
        assert_eq!(updated.description, "dented case");
        assert_eq!(updated.custody, product.custody);
    }

    #[rstest]
    fn update_rejects_zero_quantity(draft: ProductDraft) {
        let product = draft.into_product().expect("product");
        let patch = ProductPatch {
            quantity: Some(0),
            ..ProductPatch::default()
        };
        let err = plan_update(&product, patch).expect_err("zero");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details(), Some(&json!({ "field": "quantity" })));
    }

    #[rstest]
    fn update_rejects_empty_patch(draft: ProductDraft) {
        let product = draft.into_product().expect("product");
        let err = plan_update(&product, ProductPatch::default()).expect_err("empty");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
