//! Driving port for ledger mutations.

use async_trait::async_trait;

use crate::domain::{
    EmployeeId, ProductDraft, ProductId, ProductPatch, TransactionId, TransactionOutcome,
};

/// Request to hand units of a product to an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignRequest {
    pub product_id: ProductId,
    pub employee_id: EmployeeId,
    pub quantity: u32,
    /// Generated when absent.
    pub transaction_id: Option<TransactionId>,
    pub protocol_signature: Option<String>,
    pub admin_name: Option<String>,
}

/// Ledger transactions. Every failure is folded into the outcome.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryCommand: Send + Sync {
    async fn create_product(
        &self,
        draft: ProductDraft,
        admin_name: Option<String>,
    ) -> TransactionOutcome;

    async fn update_product(&self, id: ProductId, patch: ProductPatch) -> TransactionOutcome;

    async fn delete_product(&self, id: ProductId) -> TransactionOutcome;

    async fn assign(&self, request: AssignRequest) -> TransactionOutcome;

    async fn return_item(&self, product_id: ProductId) -> TransactionOutcome;
}
