//! Builders wiring adapters into the services behind `HttpState`.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use inventory::domain::ports::{
    InventoryCommand, LedgerStore, TermNotifier, UnconfiguredTermNotifier,
};
use inventory::domain::{ContractService, DirectoryService, InventoryService, TermDispatchService};
use inventory::inbound::http::state::HttpState;
use inventory::outbound::blob::LocalBlobStorage;
use inventory::outbound::memory::InMemoryLedgerStore;
use inventory::outbound::persistence::DieselLedgerStore;
use inventory::outbound::webhook::WebhookTermNotifier;

use super::ServerConfig;

/// Assemble every driving port over one store and notifier.
fn wire<S, N>(store: Arc<S>, notifier: Arc<N>, blobs: Arc<LocalBlobStorage>) -> HttpState
where
    S: LedgerStore + 'static,
    N: TermNotifier + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let inventory = Arc::new(InventoryService::new(Arc::clone(&store), Arc::clone(&clock)));
    let directory = Arc::new(DirectoryService::new(Arc::clone(&store)));
    let contracts = Arc::new(ContractService::new(
        Arc::clone(&store),
        blobs,
        Arc::clone(&clock),
    ));
    let terms = Arc::new(TermDispatchService::new(
        store,
        notifier,
        Arc::clone(&inventory) as Arc<dyn InventoryCommand>,
        clock,
    ));
    HttpState {
        inventory: inventory.clone(),
        inventory_query: inventory,
        directory: directory.clone(),
        directory_query: directory,
        contracts,
        terms,
    }
}

fn with_notifier<S>(
    store: Arc<S>,
    blobs: Arc<LocalBlobStorage>,
    config: &ServerConfig,
) -> std::io::Result<HttpState>
where
    S: LedgerStore + 'static,
{
    match &config.webhook {
        Some(webhook) => {
            let notifier = WebhookTermNotifier::new(webhook.endpoint.clone(), webhook.timeout)
                .map_err(|err| std::io::Error::other(format!("webhook client: {err}")))?;
            info!(endpoint = %webhook.endpoint, "term webhook configured");
            Ok(wire(store, Arc::new(notifier), blobs))
        }
        None => {
            warn!("INVENTORY_WEBHOOK_URL not set; term dispatch is disabled");
            Ok(wire(store, Arc::new(UnconfiguredTermNotifier), blobs))
        }
    }
}

/// Build handler state from the configured store, blob root and webhook.
///
/// # Errors
/// Returns [`std::io::Error`] when the blob root cannot be opened or the
/// webhook client cannot be constructed.
pub(crate) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let blobs = LocalBlobStorage::open(&config.blob_root, config.blob_public_base.clone())
        .map_err(|err| std::io::Error::other(format!("blob storage: {err}")))?;
    let blobs = Arc::new(blobs);

    let state = match &config.db_pool {
        Some(pool) => with_notifier(Arc::new(DieselLedgerStore::new(pool.clone())), blobs, config)?,
        None => {
            warn!("INVENTORY_DATABASE_URL not set; the ledger lives in memory only");
            with_notifier(Arc::new(InMemoryLedgerStore::new()), blobs, config)?
        }
    };
    Ok(web::Data::new(state))
}
