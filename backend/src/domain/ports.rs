//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`LedgerStore`, `BlobStorage`, `TermNotifier`) are
//! implemented by outbound adapters; driving ports (`InventoryCommand`,
//! `InventoryQuery`, `DirectoryCommand`, `DirectoryQuery`, `ContractArchive`,
//! `TermDispatch`) are implemented by domain services and consumed by the
//! HTTP adapter.

mod macros;
pub(crate) use macros::define_port_error;

mod blob_storage;
mod contract_archive;
mod employee_directory;
mod inventory_command;
mod inventory_query;
mod ledger_store;
mod term_dispatch;
mod term_notifier;

#[cfg(test)]
pub use blob_storage::MockBlobStorage;
pub use blob_storage::{BlobStorage, BlobStorageError};
#[cfg(test)]
pub use contract_archive::MockContractArchive;
pub use contract_archive::{
    ArchiveContractRequest, ContractArchive, LegacyImport, LegacyImportRequest,
};
#[cfg(test)]
pub use employee_directory::{MockDirectoryCommand, MockDirectoryQuery};
pub use employee_directory::{DirectoryCommand, DirectoryQuery};
#[cfg(test)]
pub use inventory_command::MockInventoryCommand;
pub use inventory_command::{AssignRequest, InventoryCommand};
#[cfg(test)]
pub use inventory_query::MockInventoryQuery;
pub use inventory_query::{InventoryQuery, InventorySnapshot};
#[cfg(test)]
pub use ledger_store::MockLedgerStore;
pub use ledger_store::{HistoryFilter, LedgerStore, LedgerStoreError, ProductFilter};
#[cfg(test)]
pub use term_dispatch::MockTermDispatch;
pub use term_dispatch::{DispatchTermRequest, TermDispatch};
#[cfg(test)]
pub use term_notifier::MockTermNotifier;
pub use term_notifier::{
    TermNotification, TermNotifier, TermNotifierError, UnconfiguredTermNotifier,
};
