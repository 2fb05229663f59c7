//! Product rows: descriptive fields, asset classification and custody state.
//!
//! Custody is modelled as a tagged union so that an assigned row always
//! carries its holder and a stocked or deleted row never does.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{EmployeeId, ProductId, TransactionId};

/// Error returned when parsing an enum from its wire form fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Classification governing how assignment treats a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    /// Durable equipment handed out and returned.
    Permanent,
    /// Used up on assignment; never returns to stock.
    Consumable,
    /// Legacy classification; behaves as permanent.
    Used,
    /// Legacy classification; behaves as permanent.
    New,
}

impl AssetType {
    /// Wire and column representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Permanent => "PERMANENT",
            Self::Consumable => "CONSUMABLE",
            Self::Used => "USED",
            Self::New => "NEW",
        }
    }

    /// Whether assignment consumes units instead of transferring custody.
    pub fn is_consumable(self) -> bool {
        matches!(self, Self::Consumable)
    }
}

impl FromStr for AssetType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PERMANENT" => Ok(Self::Permanent),
            "CONSUMABLE" => Ok(Self::Consumable),
            "USED" => Ok(Self::Used),
            "NEW" => Ok(Self::New),
            other => Err(ParseEnumError::new("asset type", other)),
        }
    }
}

/// Flat status projection of [`Custody`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    InStock,
    Assigned,
    Deleted,
}

impl ProductStatus {
    /// Wire and column representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InStock => "IN_STOCK",
            Self::Assigned => "ASSIGNED",
            Self::Deleted => "DELETED",
        }
    }
}

impl FromStr for ProductStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_STOCK" => Ok(Self::InStock),
            "ASSIGNED" => Ok(Self::Assigned),
            "DELETED" => Ok(Self::Deleted),
            other => Err(ParseEnumError::new("product status", other)),
        }
    }
}

/// Employee currently holding an assigned row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holder {
    pub employee_id: EmployeeId,
    /// Name snapshot taken at assignment time.
    pub employee_name: String,
    /// Active custody contract, when one was issued.
    pub transaction_id: Option<TransactionId>,
}

/// Custody state of a product row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Custody {
    InStock,
    Assigned(Holder),
    /// Terminal soft-delete.
    Deleted,
}

impl Custody {
    pub fn status(&self) -> ProductStatus {
        match self {
            Self::InStock => ProductStatus::InStock,
            Self::Assigned(_) => ProductStatus::Assigned,
            Self::Deleted => ProductStatus::Deleted,
        }
    }

    pub fn holder(&self) -> Option<&Holder> {
        match self {
            Self::Assigned(holder) => Some(holder),
            Self::InStock | Self::Deleted => None,
        }
    }
}

/// Errors raised when flat status and holder columns disagree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CustodyError {
    #[error("assigned rows must carry a holder id and name")]
    MissingHolder,
    #[error("{status} rows must not carry a holder")]
    UnexpectedHolder { status: &'static str },
}

impl Custody {
    /// Rebuild custody from flat columns, rejecting inconsistent combinations.
    pub fn from_parts(
        status: ProductStatus,
        holder_id: Option<EmployeeId>,
        holder_name: Option<String>,
        transaction_id: Option<TransactionId>,
    ) -> Result<Self, CustodyError> {
        match (status, holder_id, holder_name) {
            (ProductStatus::Assigned, Some(employee_id), Some(employee_name)) => {
                Ok(Self::Assigned(Holder {
                    employee_id,
                    employee_name,
                    transaction_id,
                }))
            }
            (ProductStatus::Assigned, _, _) => Err(CustodyError::MissingHolder),
            (ProductStatus::InStock, None, None) => Ok(Self::InStock),
            (ProductStatus::Deleted, None, None) => Ok(Self::Deleted),
            (other, _, _) => Err(CustodyError::UnexpectedHolder {
                status: other.as_str(),
            }),
        }
    }
}

/// A physical or consumable asset row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub quantity: u32,
    pub value: Decimal,
    pub asset_type: AssetType,
    pub serial_number: Option<String>,
    pub image_url: Option<String>,
    pub custody: Custody,
}

impl Product {
    pub fn status(&self) -> ProductStatus {
        self.custody.status()
    }

    pub fn holder(&self) -> Option<&Holder> {
        self.custody.holder()
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self.custody, Custody::Deleted)
    }

    /// Case-insensitive match over title, category and serial number.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            Some(self.title.as_str()),
            Some(self.category.as_str()),
            self.serial_number.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Validation failures for product drafts and patches.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductValidationError {
    #[error("{field} must not be blank")]
    Blank { field: &'static str },
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    #[error("value must not be negative")]
    NegativeValue,
}

impl ProductValidationError {
    /// Name of the offending field in the JSON contract.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Blank { field } => field,
            Self::ZeroQuantity => "quantity",
            Self::NegativeValue => "value",
        }
    }
}

fn non_blank(value: &str, field: &'static str) -> Result<(), ProductValidationError> {
    if value.trim().is_empty() {
        Err(ProductValidationError::Blank { field })
    } else {
        Ok(())
    }
}

/// Trim optional text and collapse blanks to `None`.
pub(crate) fn normalise_optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// Input for registering a new product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub quantity: u32,
    pub value: Decimal,
    pub asset_type: AssetType,
    pub serial_number: Option<String>,
    pub image_url: Option<String>,
}

impl ProductDraft {
    /// Validate and build an in-stock product with a fresh id.
    pub fn into_product(self) -> Result<Product, ProductValidationError> {
        non_blank(&self.title, "title")?;
        non_blank(&self.category, "category")?;
        if self.quantity == 0 {
            return Err(ProductValidationError::ZeroQuantity);
        }
        if self.value < Decimal::ZERO {
            return Err(ProductValidationError::NegativeValue);
        }
        Ok(Product {
            id: ProductId::random(),
            title: self.title.trim().to_owned(),
            description: self.description.trim().to_owned(),
            category: self.category.trim().to_owned(),
            quantity: self.quantity,
            value: self.value,
            asset_type: self.asset_type,
            serial_number: normalise_optional(self.serial_number),
            image_url: normalise_optional(self.image_url),
            custody: Custody::InStock,
        })
    }
}

/// Partial update of descriptive fields.
///
/// Optional text fields use a nested option: `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<u32>,
    pub value: Option<Decimal>,
    pub asset_type: Option<AssetType>,
    pub serial_number: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Whether the patch touches quantity or asset type, which only stock
    /// on the shelf may change.
    pub fn alters_stock(&self) -> bool {
        self.quantity.is_some() || self.asset_type.is_some()
    }

    /// Apply the patch to a copy of `product`, leaving custody untouched.
    pub fn apply_to(self, product: &Product) -> Result<Product, ProductValidationError> {
        let mut updated = product.clone();
        if let Some(title) = self.title {
            non_blank(&title, "title")?;
            updated.title = title.trim().to_owned();
        }
        if let Some(description) = self.description {
            updated.description = description.trim().to_owned();
        }
        if let Some(category) = self.category {
            non_blank(&category, "category")?;
            updated.category = category.trim().to_owned();
        }
        if let Some(quantity) = self.quantity {
            if quantity == 0 {
                return Err(ProductValidationError::ZeroQuantity);
            }
            updated.quantity = quantity;
        }
        if let Some(value) = self.value {
            if value < Decimal::ZERO {
                return Err(ProductValidationError::NegativeValue);
            }
            updated.value = value;
        }
        if let Some(asset_type) = self.asset_type {
            updated.asset_type = asset_type;
        }
        if let Some(serial_number) = self.serial_number {
            updated.serial_number = normalise_optional(serial_number);
        }
        if let Some(image_url) = self.image_url {
            updated.image_url = normalise_optional(image_url);
        }
        Ok(updated)
    }
}
