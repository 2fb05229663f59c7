//! Append-only history log entries.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::product::ParseEnumError;
use super::{EmployeeId, HistoryLogId, ProductId, TransactionId};

/// Actor name recorded on the `CREATED` entry of a row produced by a split.
pub const SPLIT_ACTOR_NAME: &str = "System — Split";

/// Ledger event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryAction {
    Created,
    Assigned,
    Returned,
    Consumed,
    Deleted,
}

impl HistoryAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Assigned => "ASSIGNED",
            Self::Returned => "RETURNED",
            Self::Consumed => "CONSUMED",
            Self::Deleted => "DELETED",
        }
    }
}

impl FromStr for HistoryAction {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATED" => Ok(Self::Created),
            "ASSIGNED" => Ok(Self::Assigned),
            "RETURNED" => Ok(Self::Returned),
            "CONSUMED" => Ok(Self::Consumed),
            "DELETED" => Ok(Self::Deleted),
            other => Err(ParseEnumError::new("history action", other)),
        }
    }
}

/// Immutable ledger event.
///
/// `employee_name` doubles as the actor-name field: split entries carry
/// [`SPLIT_ACTOR_NAME`] and deletion entries carry the product title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLog {
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

impl HistoryLog {
    /// Start a new entry for `product_id` stamped at `date`.
    pub fn new(action: HistoryAction, product_id: ProductId, date: DateTime<Utc>) -> Self {
        Self {
            id: HistoryLogId::random(),
            date,
            action,
            product_id: Some(product_id),
            employee_id: None,
            employee_name: None,
            transaction_id: None,
            protocol_signature: None,
            admin_name: None,
        }
    }

    #[must_use]
    pub fn with_employee(mut self, id: EmployeeId, name: impl Into<String>) -> Self {
        self.employee_id = Some(id);
        self.employee_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_actor_name(mut self, name: impl Into<String>) -> Self {
        self.employee_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_transaction(mut self, transaction_id: Option<TransactionId>) -> Self {
        self.transaction_id = transaction_id;
        self
    }

    #[must_use]
    pub fn with_signature(mut self, signature: Option<String>) -> Self {
        self.protocol_signature = signature;
        self
    }

    #[must_use]
    pub fn with_admin(mut self, admin_name: Option<String>) -> Self {
        self.admin_name = admin_name;
        self
    }

    /// Name shown in audit listings: the actor, else the dispatching admin.
    pub fn actor(&self) -> Option<&str> {
        self.employee_name
            .as_deref()
            .or(self.admin_name.as_deref())
            .filter(|name| !name.trim().is_empty())
    }
}
