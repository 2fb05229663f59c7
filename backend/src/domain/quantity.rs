//! Split and merge rules for quantity-bearing rows.
//!
//! A stock row holding `Q` units may be handed out in full or split; a
//! returned row folds back into an identical stock row when one exists.

use rust_decimal::Decimal;

use super::{AssetType, Product, ProductStatus};

/// How a request for `requested` units maps onto a row of `available` units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitDecision {
    /// The whole row changes hands.
    Full,
    /// A new row of `requested` units is carved out; `remaining` stay behind.
    Split { remaining: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QuantityError {
    #[error("quantity must be greater than zero")]
    NotPositive,
    #[error("requested {requested} unit(s) but only {available} available")]
    Insufficient { requested: u32, available: u32 },
}

/// Decide between a full hand-over and a split.
///
/// # Examples
/// ```
/// use inventory::domain::quantity::{decide_split, SplitDecision};
///
/// assert_eq!(decide_split(2, 5), Ok(SplitDecision::Split { remaining: 3 }));
/// assert_eq!(decide_split(5, 5), Ok(SplitDecision::Full));
/// assert!(decide_split(6, 5).is_err());
/// ```
pub fn decide_split(requested: u32, available: u32) -> Result<SplitDecision, QuantityError> {
    if requested == 0 {
        return Err(QuantityError::NotPositive);
    }
    match requested.cmp(&available) {
        std::cmp::Ordering::Less => Ok(SplitDecision::Split {
            remaining: available - requested,
        }),
        std::cmp::Ordering::Equal => Ok(SplitDecision::Full),
        std::cmp::Ordering::Greater => Err(QuantityError::Insufficient {
            requested,
            available,
        }),
    }
}

/// Identity under which two rows are interchangeable stock.
///
/// Description and image are presentation only and take no part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeKey<'a> {
    title: &'a str,
    category: &'a str,
    value: Decimal,
    asset_type: AssetType,
    serial_number: Option<&'a str>,
}

impl<'a> MergeKey<'a> {
    pub fn of(product: &'a Product) -> Self {
        Self {
            title: &product.title,
            category: &product.category,
            value: product.value,
            asset_type: product.asset_type,
            serial_number: product.serial_number.as_deref(),
        }
    }
}

/// Pick the stock row a returned row should merge into.
///
/// Only `IN_STOCK` rows other than `returned` qualify; among several matches
/// the lowest id wins so the choice is reproducible.
pub fn find_merge_candidate<'a, I>(returned: &Product, rows: I) -> Option<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    let key = MergeKey::of(returned);
    rows.into_iter()
        .filter(|row| row.id != returned.id)
        .filter(|row| row.status() == ProductStatus::InStock)
        .filter(|row| MergeKey::of(row) == key)
        .min_by_key(|row| row.id)
}
