//! Port for notifying the signature workflow that a custody term was issued.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Employee, Product};

use super::define_port_error;

define_port_error! {
    /// Errors raised by term notifier adapters.
    pub enum TermNotifierError {
        /// No endpoint has been configured.
        NotConfigured => "term notification endpoint is not configured",
        /// The request could not be delivered.
        Transport { message: String } => "term notification transport failed: {message}",
        /// The endpoint answered with a non-success status.
        Rejected { status: u16 } => "term notification rejected with status {status}",
    }
}

/// Everything the signature workflow needs to issue a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermNotification {
    pub employee: Employee,
    pub product: Product,
    pub admin_name: String,
    /// Rendered term document, base64 encoded.
    pub pdf_base64: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TermNotifier: Send + Sync {
    /// Whether a delivery endpoint exists. Callers check this before any write.
    fn is_configured(&self) -> bool;

    async fn notify(&self, notification: &TermNotification) -> Result<(), TermNotifierError>;
}

/// Notifier used when no webhook is configured; every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredTermNotifier;

#[async_trait]
impl TermNotifier for UnconfiguredTermNotifier {
    fn is_configured(&self) -> bool {
        false
    }

    async fn notify(&self, _notification: &TermNotification) -> Result<(), TermNotifierError> {
        Err(TermNotifierError::not_configured())
    }
}
