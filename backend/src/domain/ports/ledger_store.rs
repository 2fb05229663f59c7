//! Port for ledger persistence.
//!
//! Reads are per table; every mutation goes through [`LedgerStore::apply`],
//! which executes a [`LedgerBatch`] all-or-nothing and in order.

use async_trait::async_trait;

use crate::domain::{
    Category, ContractId, Employee, EmployeeId, HistoryLog, LedgerBatch, Product, ProductId,
    ProductStatus, SignedContract,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ledger store adapters.
    pub enum LedgerStoreError {
        /// The backing store could not be reached.
        Connection { message: String } =>
            "ledger store connection failed: {message}",
        /// A read failed or returned rows that do not decode.
        Query { message: String } =>
            "ledger store query failed: {message}",
        /// A write in a batch affected no row; the batch was rolled back.
        MissingRow { write: String, id: String } =>
            "ledger write {write} found no row {id}",
        /// A write violated a store constraint; the batch was rolled back.
        Constraint { message: String } =>
            "ledger constraint violated: {message}",
    }
}

/// Row filter for product reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductFilter {
    All,
    /// Every row except soft-deleted ones.
    Active,
    Status(ProductStatus),
    AssignedTo(EmployeeId),
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Active => !product.is_deleted(),
            Self::Status(status) => product.status() == *status,
            Self::AssignedTo(employee_id) => product
                .holder()
                .is_some_and(|holder| holder.employee_id == *employee_id),
        }
    }
}

/// Row filter for history reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryFilter {
    All,
    Product(ProductId),
}

impl HistoryFilter {
    pub fn matches(&self, log: &HistoryLog) -> bool {
        match self {
            Self::All => true,
            Self::Product(id) => log.product_id == Some(*id),
        }
    }
}

/// Persistence contract for the ledger tables.
///
/// `list_history` returns logs in append order; callers rely on it to break
/// timestamp ties.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, LedgerStoreError>;

    async fn list_products(&self, filter: ProductFilter)
    -> Result<Vec<Product>, LedgerStoreError>;

    async fn find_employee(&self, id: &EmployeeId) -> Result<Option<Employee>, LedgerStoreError>;

    async fn list_employees(&self) -> Result<Vec<Employee>, LedgerStoreError>;

    async fn list_history(&self, filter: HistoryFilter)
    -> Result<Vec<HistoryLog>, LedgerStoreError>;

    async fn list_categories(&self) -> Result<Vec<Category>, LedgerStoreError>;

    async fn find_contract(
        &self,
        id: &ContractId,
    ) -> Result<Option<SignedContract>, LedgerStoreError>;

    async fn list_contracts(&self) -> Result<Vec<SignedContract>, LedgerStoreError>;

    /// Apply every write in `batch`, or none of them.
    async fn apply(&self, batch: &LedgerBatch) -> Result<(), LedgerStoreError>;
}
