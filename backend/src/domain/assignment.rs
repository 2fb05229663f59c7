//! Assignment planning: hand an item (or part of a stock row) to an employee.
//!
//! Consumables are decremented in place and logged as consumed. Other asset
//! types must be in stock; a partial request splits the row so the assigned
//! units get a row of their own.

use chrono::{DateTime, Utc};
use serde_json::json;

use super::history::SPLIT_ACTOR_NAME;
use super::quantity::{QuantityError, SplitDecision, decide_split};
use super::{
    Custody, Employee, Error, HistoryAction, HistoryLog, Holder, LedgerBatch, LedgerWrite, Product,
    ProductId, ProductStatus, TransactionId,
};

/// Caller-supplied parameters of an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentTerms {
    pub quantity: u32,
    pub transaction_id: TransactionId,
    pub protocol_signature: Option<String>,
    pub admin_name: Option<String>,
}

/// Which path the assignment took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentKind {
    Consumed,
    Full,
    Split { source: ProductId },
}

/// Writes and identifiers produced by [`plan_assignment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentPlan {
    pub kind: AssignmentKind,
    /// Row that now carries the assigned (or consumed) units.
    pub product_id: ProductId,
    pub transaction_id: TransactionId,
    pub batch: LedgerBatch,
}

pub(crate) fn map_quantity_error(error: QuantityError) -> Error {
    match error {
        QuantityError::NotPositive => Error::invalid_request(error.to_string())
            .with_details(json!({ "field": "quantity", "code": "not_positive" })),
        QuantityError::Insufficient {
            requested,
            available,
        } => Error::insufficient_quantity(error.to_string()).with_details(json!({
            "requested": requested,
            "available": available,
        })),
    }
}

/// Plan the writes for assigning `terms.quantity` units of `product`.
///
/// # Errors
/// - `NotFound` when the product is soft-deleted.
/// - `InvalidRequest` when the quantity is zero.
/// - `InsufficientQuantity` when more units are requested than the row holds.
/// - `Conflict` when the row is not in stock; consumables in someone's
///   custody are not drawn from either.
pub fn plan_assignment(
    product: &Product,
    employee: &Employee,
    terms: AssignmentTerms,
    now: DateTime<Utc>,
) -> Result<AssignmentPlan, Error> {
    if product.is_deleted() {
        return Err(Error::not_found(format!("product {} not found", product.id)));
    }
    if terms.quantity == 0 {
        return Err(map_quantity_error(QuantityError::NotPositive));
    }
    if product.status() != ProductStatus::InStock {
        return Err(Error::conflict(format!("product {} is already assigned", product.id))
            .with_details(json!({ "status": product.status().as_str() })));
    }
    if product.asset_type.is_consumable() {
        return plan_consumption(product, employee, terms, now);
    }

    let decision = decide_split(terms.quantity, product.quantity).map_err(map_quantity_error)?;
    let holder = Holder {
        employee_id: employee.id,
        employee_name: employee.name.clone(),
        transaction_id: Some(terms.transaction_id),
    };

    match decision {
        SplitDecision::Full => {
            let batch = LedgerBatch::new()
                .with(LedgerWrite::SetCustody {
                    product_id: product.id,
                    expected: ProductStatus::InStock,
                    custody: Custody::Assigned(holder),
                })
                .with(LedgerWrite::AppendLog(assigned_log(product.id, employee, &terms, now)));
            Ok(AssignmentPlan {
                kind: AssignmentKind::Full,
                product_id: product.id,
                transaction_id: terms.transaction_id,
                batch,
            })
        }
        SplitDecision::Split { .. } => {
            let split = Product {
                id: ProductId::random(),
                quantity: terms.quantity,
                custody: Custody::Assigned(holder),
                ..product.clone()
            };
            let split_id = split.id;
            let batch = LedgerBatch::new()
                .with(LedgerWrite::AdjustQuantity {
                    product_id: product.id,
                    delta: -i64::from(terms.quantity),
                })
                .with(LedgerWrite::InsertProduct(split))
                .with(LedgerWrite::AppendLog(
                    HistoryLog::new(HistoryAction::Created, split_id, now)
                        .with_actor_name(SPLIT_ACTOR_NAME),
                ))
                .with(LedgerWrite::AppendLog(assigned_log(split_id, employee, &terms, now)));
            Ok(AssignmentPlan {
                kind: AssignmentKind::Split { source: product.id },
                product_id: split_id,
                transaction_id: terms.transaction_id,
                batch,
            })
        }
    }
}

fn plan_consumption(
    product: &Product,
    employee: &Employee,
    terms: AssignmentTerms,
    now: DateTime<Utc>,
) -> Result<AssignmentPlan, Error> {
    if terms.quantity > product.quantity {
        return Err(map_quantity_error(QuantityError::Insufficient {
            requested: terms.quantity,
            available: product.quantity,
        }));
    }
    let log = HistoryLog::new(HistoryAction::Consumed, product.id, now)
        .with_employee(employee.id, employee.name.clone())
        .with_transaction(Some(terms.transaction_id))
        .with_signature(terms.protocol_signature.clone())
        .with_admin(terms.admin_name.clone());
    let batch = LedgerBatch::new()
        .with(LedgerWrite::AdjustQuantity {
            product_id: product.id,
            delta: -i64::from(terms.quantity),
        })
        .with(LedgerWrite::AppendLog(log));
    Ok(AssignmentPlan {
        kind: AssignmentKind::Consumed,
        product_id: product.id,
        transaction_id: terms.transaction_id,
        batch,
    })
}

fn assigned_log(
    product_id: ProductId,
    employee: &Employee,
    terms: &AssignmentTerms,
    now: DateTime<Utc>,
) -> HistoryLog {
    HistoryLog::new(HistoryAction::Assigned, product_id, now)
        .with_employee(employee.id, employee.name.clone())
        .with_transaction(Some(terms.transaction_id))
        .with_signature(terms.protocol_signature.clone())
        .with_admin(terms.admin_name.clone())
}
