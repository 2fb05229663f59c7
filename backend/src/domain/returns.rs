//! Return planning: bring an assigned row back to stock.
//!
//! When an identical stock row exists the returned units fold into it and
//! the returned row disappears, with its history repointed to the survivor.
//! Otherwise the row itself goes back to stock.

use chrono::{DateTime, Utc};
use serde_json::json;

use super::quantity::find_merge_candidate;
use super::{
    Custody, Error, HistoryAction, HistoryLog, LedgerBatch, LedgerWrite, Product, ProductId,
    ProductStatus, TransactionId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnKind {
    /// Units merged into an existing stock row.
    Merged { returned: ProductId },
    /// The returned row itself went back to stock.
    Restocked,
}

/// Writes and identifiers produced by [`plan_return`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnPlan {
    pub kind: ReturnKind,
    /// Row holding the returned units afterwards.
    pub product_id: ProductId,
    /// Custody contract closed by this return.
    pub transaction_id: Option<TransactionId>,
    pub holder_name: String,
    pub batch: LedgerBatch,
}

/// Plan the writes for returning `product`, considering `stock` for a merge.
///
/// # Errors
/// - `NotFound` when the product is soft-deleted.
/// - `Conflict` when the product is not assigned.
pub fn plan_return<'a, I>(
    product: &Product,
    stock: I,
    now: DateTime<Utc>,
) -> Result<ReturnPlan, Error>
where
    I: IntoIterator<Item = &'a Product>,
{
    if product.is_deleted() {
        return Err(Error::not_found(format!("product {} not found", product.id)));
    }
    let Some(holder) = product.holder() else {
        return Err(
            Error::conflict(format!("product {} is not assigned", product.id))
                .with_details(json!({ "status": product.status().as_str() })),
        );
    };

    let returned_log = |target: ProductId| {
        HistoryLog::new(HistoryAction::Returned, target, now)
            .with_employee(holder.employee_id, holder.employee_name.clone())
            .with_transaction(holder.transaction_id)
    };

    match find_merge_candidate(product, stock) {
        Some(candidate) => {
            let batch = LedgerBatch::new()
                .with(LedgerWrite::AdjustQuantity {
                    product_id: candidate.id,
                    delta: i64::from(product.quantity),
                })
                .with(LedgerWrite::DeleteProduct(product.id))
                .with(LedgerWrite::RepointLogs {
                    from: product.id,
                    to: candidate.id,
                })
                .with(LedgerWrite::AppendLog(returned_log(candidate.id)));
            Ok(ReturnPlan {
                kind: ReturnKind::Merged {
                    returned: product.id,
                },
                product_id: candidate.id,
                transaction_id: holder.transaction_id,
                holder_name: holder.employee_name.clone(),
                batch,
            })
        }
        None => {
            let batch = LedgerBatch::new()
                .with(LedgerWrite::SetCustody {
                    product_id: product.id,
                    expected: ProductStatus::Assigned,
                    custody: Custody::InStock,
                })
                .with(LedgerWrite::AppendLog(returned_log(product.id)));
            Ok(ReturnPlan {
                kind: ReturnKind::Restocked,
                product_id: product.id,
                transaction_id: holder.transaction_id,
                holder_name: holder.employee_name.clone(),
                batch,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssetType, EmployeeId, ErrorCode, Holder, ProductStatus};
    use rstest::{fixture, rstest};
    use rust_decimal::Decimal;

    fn row(quantity: u32, custody: Custody) -> Product {
        Product {
            id: ProductId::random(),
            title: "Laptop".to_owned(),
            description: String::new(),
            category: "IT".to_owned(),
            quantity,
            value: Decimal::new(3500, 0),
            asset_type: AssetType::Permanent,
            serial_number: None,
            image_url: None,
            custody,
        }
    }

    #[fixture]
    fn holder() -> Holder {
        Holder {
            employee_id: EmployeeId::random(),
            employee_name: "Ana".to_owned(),
            transaction_id: Some(TransactionId::random()),
        }
    }

    #[rstest]
    fn merges_into_matching_stock_row(holder: Holder) {
        let assigned = row(2, Custody::Assigned(holder.clone()));
        let stock = row(3, Custody::InStock);

        let plan = plan_return(&assigned, [&stock], Utc::now()).expect("plan");

        assert_eq!(plan.product_id, stock.id);
        assert_eq!(plan.kind, ReturnKind::Merged { returned: assigned.id });
        let writes = plan.batch.writes();
        assert_eq!(
            writes[0],
            LedgerWrite::AdjustQuantity {
                product_id: stock.id,
                delta: 2
            }
        );
        assert_eq!(writes[1], LedgerWrite::DeleteProduct(assigned.id));
        assert_eq!(
            writes[2],
            LedgerWrite::RepointLogs {
                from: assigned.id,
                to: stock.id
            }
        );
        let LedgerWrite::AppendLog(log) = &writes[3] else {
            panic!("expected returned log");
        };
        assert_eq!(log.product_id, Some(stock.id));
        assert_eq!(log.employee_name.as_deref(), Some("Ana"));
        assert_eq!(log.transaction_id, holder.transaction_id);
    }

    #[rstest]
    fn restocks_when_no_candidate(holder: Holder) {
        let assigned = row(1, Custody::Assigned(holder));
        let mut other = row(4, Custody::InStock);
        other.serial_number = Some("SN-9".to_owned());

        let plan = plan_return(&assigned, [&other], Utc::now()).expect("plan");

        assert_eq!(plan.kind, ReturnKind::Restocked);
        assert_eq!(
            plan.batch.writes()[0],
            LedgerWrite::SetCustody {
                product_id: assigned.id,
                expected: ProductStatus::Assigned,
                custody: Custody::InStock,
            }
        );
    }

    #[rstest]
    fn rejects_rows_that_are_not_assigned() {
        let stock = row(1, Custody::InStock);
        let err = plan_return(&stock, std::iter::empty::<&Product>(), Utc::now())
            .expect_err("conflict");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    fn rejects_deleted_rows() {
        let deleted = row(1, Custody::Deleted);
        let err = plan_return(&deleted, std::iter::empty::<&Product>(), Utc::now())
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
