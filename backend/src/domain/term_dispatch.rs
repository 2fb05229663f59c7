//! Custody term dispatch: notify the signature workflow, then assign.
//!
//! The assignment is validated before the webhook fires so a term is never
//! sent for a hand-over the ledger would refuse.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::assignment::{AssignmentTerms, plan_assignment};
use crate::domain::ports::{
    AssignRequest, DispatchTermRequest, InventoryCommand, LedgerStore, TermDispatch,
    TermNotification, TermNotifier, TermNotifierError,
};
use crate::domain::store_errors::map_read_error;
use crate::domain::{Error, TransactionId, TransactionOutcome};

/// Protocol signature recorded on assignments made through a dispatched term.
pub const DISPATCHED_TERM_SIGNATURE: &str = "Termo Enviado via Sistema";

pub struct TermDispatchService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    inventory: Arc<dyn InventoryCommand>,
    clock: Arc<dyn Clock>,
}

impl<S, N> TermDispatchService<S, N> {
    pub fn new(
        store: Arc<S>,
        notifier: Arc<N>,
        inventory: Arc<dyn InventoryCommand>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            notifier,
            inventory,
            clock,
        }
    }
}

fn map_notifier_error(err: TermNotifierError) -> Error {
    match err {
        TermNotifierError::NotConfigured => {
            Error::configuration_missing("No term notification webhook is configured.")
        }
        other => {
            warn!(kind = other.kind(), error = %other, "term notification failed");
            Error::service_unavailable("The signature service did not accept the term.")
        }
    }
}

impl<S, N> TermDispatchService<S, N>
where
    S: LedgerStore,
    N: TermNotifier,
{
    async fn notify(&self, request: &DispatchTermRequest) -> Result<(), Error> {
        if !self.notifier.is_configured() {
            return Err(map_notifier_error(TermNotifierError::not_configured()));
        }
        if request.admin_name.trim().is_empty() {
            return Err(Error::invalid_request("adminName must not be blank"));
        }
        let payload = request.pdf_base64.trim();
        if payload.is_empty() || STANDARD.decode(payload).is_err() {
            return Err(Error::invalid_request("pdfBase64 is not valid base64"));
        }

        let product = self
            .store
            .find_product(&request.product_id)
            .await
            .map_err(map_read_error)?
            .filter(|product| !product.is_deleted())
            .ok_or_else(|| Error::not_found(format!("product {} not found", request.product_id)))?;
        let employee = self
            .store
            .find_employee(&request.employee_id)
            .await
            .map_err(map_read_error)?
            .ok_or_else(|| {
                Error::not_found(format!("employee {} not found", request.employee_id))
            })?;

        let now = self.clock.utc();
        let terms = AssignmentTerms {
            quantity: request.quantity,
            transaction_id: TransactionId::random(),
            protocol_signature: Some(DISPATCHED_TERM_SIGNATURE.to_owned()),
            admin_name: Some(request.admin_name.clone()),
        };
        plan_assignment(&product, &employee, terms, now)?;

        let notification = TermNotification {
            employee,
            product,
            admin_name: request.admin_name.clone(),
            pdf_base64: payload.to_owned(),
            timestamp: now,
        };
        self.notifier
            .notify(&notification)
            .await
            .map_err(map_notifier_error)?;
        info!(product_id = %request.product_id, "custody term dispatched");
        Ok(())
    }
}

#[async_trait]
impl<S, N> TermDispatch for TermDispatchService<S, N>
where
    S: LedgerStore,
    N: TermNotifier,
{
    async fn dispatch(&self, request: DispatchTermRequest) -> TransactionOutcome {
        if let Err(err) = self.notify(&request).await {
            warn!(code = err.code().as_str(), message = %err, "term dispatch rejected");
            return TransactionOutcome::failed(&err);
        }
        self.inventory
            .assign(AssignRequest {
                product_id: request.product_id,
                employee_id: request.employee_id,
                quantity: request.quantity,
                transaction_id: None,
                protocol_signature: Some(DISPATCHED_TERM_SIGNATURE.to_owned()),
                admin_name: Some(request.admin_name),
            })
            .await
    }
}
