//! Result envelope returned by every ledger transaction.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Error, ErrorCode, ProductId, TransactionId};

/// What a successful transaction reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub message: String,
    pub product_id: Option<ProductId>,
    pub transaction_id: Option<TransactionId>,
}

impl TransactionReceipt {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            product_id: None,
            transaction_id: None,
        }
    }

    #[must_use]
    pub fn with_product(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(product_id);
        self
    }

    #[must_use]
    pub fn with_transaction(mut self, transaction_id: Option<TransactionId>) -> Self {
        self.transaction_id = transaction_id;
        self
    }
}

/// Success flag plus a human-readable message; failures carry a code.
///
/// Transactions never surface errors past this envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl TransactionOutcome {
    pub fn failed(error: &Error) -> Self {
        Self {
            success: false,
            message: error.message().to_owned(),
            code: Some(error.code()),
            product_id: None,
            transaction_id: None,
            trace_id: error.trace_id().map(str::to_owned),
        }
    }
}

impl From<TransactionReceipt> for TransactionOutcome {
    fn from(receipt: TransactionReceipt) -> Self {
        Self {
            success: true,
            message: receipt.message,
            code: None,
            product_id: receipt.product_id,
            transaction_id: receipt.transaction_id,
            trace_id: None,
        }
    }
}

impl From<Result<TransactionReceipt, Error>> for TransactionOutcome {
    fn from(result: Result<TransactionReceipt, Error>) -> Self {
        match result {
            Ok(receipt) => receipt.into(),
            Err(error) => Self::failed(&error),
        }
    }
}
