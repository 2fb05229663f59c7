//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    ContractArchive, DirectoryCommand, DirectoryQuery, InventoryCommand, InventoryQuery,
    TermDispatch,
};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use inventory::domain::{
///     ContractService, DirectoryService, InventoryService, TermDispatchService,
/// };
/// use inventory::domain::ports::{InventoryCommand, UnconfiguredTermNotifier};
/// use inventory::inbound::http::state::HttpState;
/// use inventory::outbound::memory::InMemoryLedgerStore;
/// use inventory::outbound::blob::LocalBlobStorage;
/// use mockable::DefaultClock;
///
/// # fn build() -> Result<HttpState, Box<dyn std::error::Error>> {
/// let store = Arc::new(InMemoryLedgerStore::new());
/// let clock = Arc::new(DefaultClock);
/// let inventory = Arc::new(InventoryService::new(store.clone(), clock.clone()));
/// let directory = Arc::new(DirectoryService::new(store.clone()));
/// let root = std::env::temp_dir().join("inventory-doc-blobs");
/// let blobs = Arc::new(LocalBlobStorage::open(root, "http://localhost/files".parse()?)?);
/// let contracts = Arc::new(ContractService::new(store.clone(), blobs, clock.clone()));
/// let terms = Arc::new(TermDispatchService::new(
///     store,
///     Arc::new(UnconfiguredTermNotifier),
///     inventory.clone() as Arc<dyn InventoryCommand>,
///     clock,
/// ));
/// let state = HttpState {
///     inventory: inventory.clone(),
///     inventory_query: inventory,
///     directory: directory.clone(),
///     directory_query: directory,
///     contracts,
///     terms,
/// };
/// # Ok(state)
/// # }
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub inventory: Arc<dyn InventoryCommand>,
    pub inventory_query: Arc<dyn InventoryQuery>,
    pub directory: Arc<dyn DirectoryCommand>,
    pub directory_query: Arc<dyn DirectoryQuery>,
    pub contracts: Arc<dyn ContractArchive>,
    pub terms: Arc<dyn TermDispatch>,
}
