//! PostgreSQL persistence for the ledger using Diesel ORM.
//!
//! - **Thin adapter**: `DieselLedgerStore` translates between row structs
//!   and domain records; no ledger rules live here.
//! - **Internal models**: `models.rs` and `schema.rs` never leave this module.
//! - **Atomic batches**: every `LedgerBatch` runs in one transaction.
//! - **Embedded migrations**: `MIGRATIONS` carries `backend/migrations`.

mod diesel_ledger_error_mapping;
mod diesel_ledger_store;
mod models;
mod pool;
mod schema;

use diesel_migrations::{EmbeddedMigrations, embed_migrations};

pub use diesel_ledger_store::DieselLedgerStore;
pub use pool::{DbPool, PoolConfig, PoolError};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");
