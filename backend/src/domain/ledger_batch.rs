//! Ordered row writes applied atomically by a ledger store.
//!
//! Transactions plan a [`LedgerBatch`] from a snapshot of the rows they read;
//! adapters apply it all-or-nothing, in order.

use super::{
    Category, ContractId, Custody, Employee, EmployeeId, HistoryLog, Product, ProductId,
    ProductStatus, SignedContract,
};

/// A single row write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerWrite {
    InsertProduct(Product),
    /// Replace every column of an existing row.
    UpdateProduct(Product),
    /// Move a row into `custody`, touching only the custody columns. Finds
    /// no row unless the stored status is still `expected`.
    SetCustody {
        product_id: ProductId,
        expected: ProductStatus,
        custody: Custody,
    },
    /// Add `delta` to the stored quantity; the result must stay non-negative.
    AdjustQuantity {
        product_id: ProductId,
        delta: i64,
    },
    DeleteProduct(ProductId),
    AppendLog(HistoryLog),
    /// Point every log of `from` at `to`. Matching zero logs is not an error.
    RepointLogs {
        from: ProductId,
        to: ProductId,
    },
    InsertEmployee(Employee),
    UpdateEmployee(Employee),
    DeleteEmployee(EmployeeId),
    InsertCategory(Category),
    InsertContract(SignedContract),
    DeleteContract(ContractId),
}

impl LedgerWrite {
    /// Short label used in logs and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InsertProduct(_) => "insert_product",
            Self::UpdateProduct(_) => "update_product",
            Self::SetCustody { .. } => "set_custody",
            Self::AdjustQuantity { .. } => "adjust_quantity",
            Self::DeleteProduct(_) => "delete_product",
            Self::AppendLog(_) => "append_log",
            Self::RepointLogs { .. } => "repoint_logs",
            Self::InsertEmployee(_) => "insert_employee",
            Self::UpdateEmployee(_) => "update_employee",
            Self::DeleteEmployee(_) => "delete_employee",
            Self::InsertCategory(_) => "insert_category",
            Self::InsertContract(_) => "insert_contract",
            Self::DeleteContract(_) => "delete_contract",
        }
    }
}

/// Ordered list of writes belonging to one transaction.
///
/// # Examples
/// ```
/// use inventory::domain::{LedgerBatch, LedgerWrite, ProductId};
///
/// let batch = LedgerBatch::new().with(LedgerWrite::DeleteProduct(ProductId::random()));
/// assert_eq!(batch.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerBatch {
    writes: Vec<LedgerWrite>,
}

impl LedgerBatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, write: LedgerWrite) -> Self {
        self.writes.push(write);
        self
    }

    pub fn push(&mut self, write: LedgerWrite) {
        self.writes.push(write);
    }

    pub fn writes(&self) -> &[LedgerWrite] {
        &self.writes
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Write labels in order, for logging.
    pub fn labels(&self) -> Vec<&'static str> {
        self.writes.iter().map(LedgerWrite::label).collect()
    }
}

impl IntoIterator for LedgerBatch {
    type Item = LedgerWrite;
    type IntoIter = std::vec::IntoIter<LedgerWrite>;

    fn into_iter(self) -> Self::IntoIter {
        self.writes.into_iter()
    }
}
