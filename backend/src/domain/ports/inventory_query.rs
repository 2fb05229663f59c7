//! Driving port for ledger reads.

use async_trait::async_trait;

use crate::domain::history_projection::{AuditEntry, HistoryEntry};
use crate::domain::{Category, Employee, Error, HistoryLog, Product, ProductId};

/// Fresh view of every table, taken after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventorySnapshot {
    /// Rows that are not soft-deleted.
    pub products: Vec<Product>,
    pub employees: Vec<Employee>,
    /// Newest first.
    pub history: Vec<HistoryEntry>,
    pub categories: Vec<Category>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryQuery: Send + Sync {
    async fn snapshot(&self) -> Result<InventorySnapshot, Error>;

    /// Live rows, optionally filtered by a case-insensitive search.
    async fn active_products(&self, search: Option<String>) -> Result<Vec<Product>, Error>;

    /// A single row, including soft-deleted ones.
    async fn product(&self, id: ProductId) -> Result<Product, Error>;

    /// Logs of one product, oldest first.
    async fn product_history(&self, id: ProductId) -> Result<Vec<HistoryLog>, Error>;

    /// Every log, newest first.
    async fn global_history(&self) -> Result<Vec<HistoryEntry>, Error>;

    async fn audit_trail(&self, search: Option<String>) -> Result<Vec<AuditEntry>, Error>;
}
