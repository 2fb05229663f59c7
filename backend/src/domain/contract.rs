//! Signed custody contracts and the upload rules for their files.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::product::ParseEnumError;
use super::{ContractId, EmployeeId, ProductId, TransactionId};

/// Largest accepted contract file.
pub const MAX_CONTRACT_BYTES: usize = 5 * 1024 * 1024;

/// Blob namespace holding contract files.
pub const CONTRACTS_PREFIX: &str = "contracts";

/// Whether the contract documents a hand-over or a return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractKind {
    Delivery,
    Return,
}

impl ContractKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delivery => "DELIVERY",
            Self::Return => "RETURN",
        }
    }
}

impl FromStr for ContractKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DELIVERY" => Ok(Self::Delivery),
            "RETURN" => Ok(Self::Return),
            other => Err(ParseEnumError::new("contract kind", other)),
        }
    }
}

/// Accepted file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractFormat {
    Pdf,
    Png,
    Jpeg,
}

impl ContractFormat {
    /// Resolve a MIME type; parameters such as `; charset=` are ignored.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "application/pdf" => Some(Self::Pdf),
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

/// Blob path for a new contract file: `contracts/{employee}/{uuid}.{ext}`.
pub fn contract_file_path(employee_id: &EmployeeId, format: ContractFormat) -> String {
    format!(
        "{CONTRACTS_PREFIX}/{employee_id}/{}.{}",
        uuid::Uuid::new_v4(),
        format.extension()
    )
}

/// Archived signed document linking an employee and a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedContract {
    pub id: ContractId,
    pub employee_id: EmployeeId,
    pub product_id: ProductId,
    pub transaction_id: Option<TransactionId>,
    pub kind: ContractKind,
    pub file_path: String,
    pub file_url: String,
    pub created_at: DateTime<Utc>,
}
