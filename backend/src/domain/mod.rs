//! Inventory domain: records, ledger planners and services.
//!
//! Purpose: model products, employees, history logs and contracts, and
//! express every ledger transaction as a pure plan (a [`LedgerBatch`]) that a
//! [`ports::LedgerStore`] applies atomically. Services wire the planners to
//! the driven ports and fold failures into [`TransactionOutcome`]s.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifiers.
//! - Product, Employee, HistoryLog, Category, SignedContract: ledger records.
//! - LedgerBatch / LedgerWrite: ordered, all-or-nothing row writes.
//! - InventoryService, DirectoryService, ContractService,
//!   TermDispatchService: driving port implementations.

pub mod assignment;
pub mod category;
pub mod contract;
pub mod contract_service;
pub mod directory_service;
pub mod employee;
pub mod error;
pub mod history;
pub mod history_projection;
pub mod ids;
pub mod inventory_service;
pub mod ledger_batch;
pub mod legacy_import;
pub mod outcome;
pub mod ports;
pub mod product;
pub mod product_lifecycle;
pub mod quantity;
pub mod returns;
mod store_errors;
pub mod term_dispatch;
pub mod trace_id;

pub use self::category::{BlankCategoryName, Category};
pub use self::contract::{
    CONTRACTS_PREFIX, ContractFormat, ContractKind, MAX_CONTRACT_BYTES, SignedContract,
    contract_file_path,
};
pub use self::contract_service::ContractService;
pub use self::directory_service::DirectoryService;
pub use self::employee::{Employee, EmployeeDraft, EmployeePatch, EmployeeValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::history::{HistoryAction, HistoryLog, SPLIT_ACTOR_NAME};
pub use self::ids::{CategoryId, ContractId, EmployeeId, HistoryLogId, ProductId, TransactionId};
pub use self::inventory_service::InventoryService;
pub use self::ledger_batch::{LedgerBatch, LedgerWrite};
pub use self::legacy_import::{LegacyImportPlan, LegacyItem, plan_legacy_import};
pub use self::outcome::{TransactionOutcome, TransactionReceipt};
pub use self::product::{
    AssetType, Custody, CustodyError, Holder, ParseEnumError, Product, ProductDraft, ProductPatch,
    ProductStatus, ProductValidationError,
};
pub use self::term_dispatch::{DISPATCHED_TERM_SIGNATURE, TermDispatchService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use inventory::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no such product"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
