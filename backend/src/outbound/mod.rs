//! Outbound adapters implementing the driven ports.
//!
//! - **memory**: volatile `LedgerStore` for local runs and tests
//! - **persistence**: PostgreSQL `LedgerStore` using Diesel
//! - **blob**: filesystem `BlobStorage` for contract files
//! - **webhook**: HTTP `TermNotifier` for the signature workflow
//!
//! Adapters translate between domain records and infrastructure
//! representations. They contain no ledger rules.

pub mod blob;
pub mod memory;
pub mod persistence;
pub mod webhook;
