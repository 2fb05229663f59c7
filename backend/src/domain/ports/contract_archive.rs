//! Driving port for the signed contract archive.

use async_trait::async_trait;

use crate::domain::{
    ContractId, ContractKind, EmployeeId, Error, LegacyItem, Product, ProductId, SignedContract,
};

/// Upload of one signed document covering one or more products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveContractRequest {
    pub employee_id: EmployeeId,
    pub product_ids: Vec<ProductId>,
    pub kind: ContractKind,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Paper contract for an item the employee already holds, registered
/// together with that item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyImportRequest {
    pub employee_id: EmployeeId,
    pub item: LegacyItem,
    pub admin_name: Option<String>,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Rows created by a legacy import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyImport {
    pub product: Product,
    pub contract: SignedContract,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContractArchive: Send + Sync {
    /// Store the file once and record one contract per product.
    async fn archive(&self, request: ArchiveContractRequest) -> Result<Vec<SignedContract>, Error>;

    /// Register an assigned unit and attach its contract in one batch.
    async fn import_legacy(&self, request: LegacyImportRequest) -> Result<LegacyImport, Error>;

    /// Newest first.
    async fn list(&self) -> Result<Vec<SignedContract>, Error>;

    async fn delete(&self, id: ContractId) -> Result<(), Error>;
}
