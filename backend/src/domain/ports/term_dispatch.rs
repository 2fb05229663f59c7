//! Driving port for sending a custody term and assigning on success.

use async_trait::async_trait;

use crate::domain::{EmployeeId, ProductId, TransactionOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchTermRequest {
    pub product_id: ProductId,
    pub employee_id: EmployeeId,
    pub quantity: u32,
    pub admin_name: String,
    pub pdf_base64: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TermDispatch: Send + Sync {
    async fn dispatch(&self, request: DispatchTermRequest) -> TransactionOutcome;
}
