//! Signed contract archive over blob storage and the ledger store.
//!
//! One upload may cover several products: the file is stored once and one
//! contract row is recorded per product, all in a single batch.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    ArchiveContractRequest, BlobStorage, ContractArchive, LedgerStore, LegacyImport,
    LegacyImportRequest,
};
use crate::domain::store_errors::{map_read_error, map_write_error};
use crate::domain::{
    ContractFormat, ContractId, ContractKind, Employee, EmployeeId, Error, LedgerBatch,
    LedgerWrite, LegacyImportPlan, MAX_CONTRACT_BYTES, ProductId, SignedContract,
    contract_file_path, plan_legacy_import,
};

#[derive(Clone)]
pub struct ContractService<S, B> {
    store: Arc<S>,
    blobs: Arc<B>,
    clock: Arc<dyn Clock>,
}

impl<S, B> ContractService<S, B> {
    pub fn new(store: Arc<S>, blobs: Arc<B>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            blobs,
            clock,
        }
    }
}

fn validate_file(content_type: &str, bytes: &[u8]) -> Result<ContractFormat, Error> {
    if bytes.is_empty() {
        return Err(Error::invalid_request("the contract file is empty"));
    }
    if bytes.len() > MAX_CONTRACT_BYTES {
        return Err(
            Error::invalid_request("the contract file exceeds the 5 MiB limit")
                .with_details(json!({ "size": bytes.len(), "limit": MAX_CONTRACT_BYTES })),
        );
    }
    ContractFormat::from_content_type(content_type).ok_or_else(|| {
        Error::invalid_request("contracts must be PDF, PNG or JPEG files")
            .with_details(json!({ "contentType": content_type }))
    })
}

fn validate_upload(request: &ArchiveContractRequest) -> Result<ContractFormat, Error> {
    if request.product_ids.is_empty() {
        return Err(Error::invalid_request(
            "a contract must cover at least one product",
        ));
    }
    validate_file(&request.content_type, &request.bytes)
}

fn distinct(ids: &[ProductId]) -> Vec<ProductId> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(id) {
            seen.push(*id);
        }
    }
    seen
}

impl<S, B> ContractService<S, B>
where
    S: LedgerStore,
    B: BlobStorage,
{
    async fn employee(&self, id: &EmployeeId) -> Result<Employee, Error> {
        self.store
            .find_employee(id)
            .await
            .map_err(map_read_error)?
            .ok_or_else(|| Error::not_found(format!("employee {id} not found")))
    }

    async fn store_file(
        &self,
        path: &str,
        bytes: &[u8],
        format: ContractFormat,
    ) -> Result<String, Error> {
        self.blobs
            .upload(path, bytes, format.content_type())
            .await
            .map_err(|err| {
                warn!(path, error = %err, "contract upload failed");
                Error::service_unavailable("The contract file could not be stored.")
            })
    }

    /// Remove an uploaded blob whose rows never landed.
    async fn discard_blob(&self, path: &str) {
        if let Err(err) = self.blobs.remove(path).await {
            warn!(path, error = %err, "failed to discard orphaned contract file");
        }
    }
}

#[async_trait]
impl<S, B> ContractArchive for ContractService<S, B>
where
    S: LedgerStore,
    B: BlobStorage,
{
    async fn archive(
        &self,
        request: ArchiveContractRequest,
    ) -> Result<Vec<SignedContract>, Error> {
        let format = validate_upload(&request)?;
        self.employee(&request.employee_id).await?;

        let mut products = Vec::new();
        for id in distinct(&request.product_ids) {
            let product = self
                .store
                .find_product(&id)
                .await
                .map_err(map_read_error)?
                .ok_or_else(|| Error::not_found(format!("product {id} not found")))?;
            products.push(product);
        }

        let path = contract_file_path(&request.employee_id, format);
        let url = self.store_file(&path, &request.bytes, format).await?;

        let created_at = self.clock.utc();
        let contracts: Vec<SignedContract> = products
            .iter()
            .map(|product| SignedContract {
                id: ContractId::random(),
                employee_id: request.employee_id,
                product_id: product.id,
                transaction_id: product.holder().and_then(|holder| holder.transaction_id),
                kind: request.kind,
                file_path: path.clone(),
                file_url: url.clone(),
                created_at,
            })
            .collect();
        let batch = contracts
            .iter()
            .cloned()
            .map(LedgerWrite::InsertContract)
            .fold(LedgerBatch::new(), LedgerBatch::with);

        if let Err(err) = self.store.apply(&batch).await {
            self.discard_blob(&path).await;
            return Err(map_write_error(err));
        }
        info!(
            employee_id = %request.employee_id,
            file_name = %request.file_name,
            contracts = contracts.len(),
            "contract archived"
        );
        Ok(contracts)
    }

    async fn import_legacy(&self, request: LegacyImportRequest) -> Result<LegacyImport, Error> {
        let format = validate_file(&request.content_type, &request.bytes)?;
        let employee = self.employee(&request.employee_id).await?;
        let now = self.clock.utc();
        let LegacyImportPlan {
            product,
            transaction_id,
            mut batch,
        } = plan_legacy_import(request.item, &employee, request.admin_name, now)?;

        let path = contract_file_path(&employee.id, format);
        let url = self.store_file(&path, &request.bytes, format).await?;
        let contract = SignedContract {
            id: ContractId::random(),
            employee_id: employee.id,
            product_id: product.id,
            transaction_id: Some(transaction_id),
            kind: ContractKind::Delivery,
            file_path: path.clone(),
            file_url: url,
            created_at: now,
        };
        batch.push(LedgerWrite::InsertContract(contract.clone()));

        if let Err(err) = self.store.apply(&batch).await {
            self.discard_blob(&path).await;
            return Err(map_write_error(err));
        }
        info!(
            employee_id = %employee.id,
            product_id = %product.id,
            file_name = %request.file_name,
            "legacy contract imported"
        );
        Ok(LegacyImport { product, contract })
    }

    async fn list(&self) -> Result<Vec<SignedContract>, Error> {
        let mut contracts = self.store.list_contracts().await.map_err(map_read_error)?;
        contracts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(contracts)
    }

    async fn delete(&self, id: ContractId) -> Result<(), Error> {
        let contract = self
            .store
            .find_contract(&id)
            .await
            .map_err(map_read_error)?
            .ok_or_else(|| Error::not_found(format!("contract {id} not found")))?;
        self.store
            .apply(&LedgerBatch::new().with(LedgerWrite::DeleteContract(id)))
            .await
            .map_err(map_write_error)?;

        // Sibling rows from the same upload keep the file alive.
        let remaining = self.store.list_contracts().await.map_err(map_read_error)?;
        if remaining
            .iter()
            .any(|other| other.file_path == contract.file_path)
        {
            return Ok(());
        }
        if let Err(err) = self.blobs.remove(&contract.file_path).await {
            warn!(path = %contract.file_path, error = %err, "contract file left behind");
        }
        Ok(())
    }
}
