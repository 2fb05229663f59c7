//! Inventory domain service implementing the ledger driving ports.
//!
//! Each transaction reads the rows it needs, plans a [`LedgerBatch`] with the
//! pure planners and hands it to the store in one call. Failures are folded
//! into a [`TransactionOutcome`] at this boundary.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::assignment::{AssignmentKind, AssignmentTerms, plan_assignment};
use crate::domain::history_projection::{
    AuditEntry, HistoryEntry, audit_trail, global_feed, product_timeline,
};
use crate::domain::ports::{
    AssignRequest, HistoryFilter, InventoryCommand, InventoryQuery, InventorySnapshot,
    LedgerStore, ProductFilter,
};
use crate::domain::product_lifecycle::{plan_creation, plan_deletion, plan_update};
use crate::domain::returns::{ReturnKind, plan_return};
use crate::domain::store_errors::{map_read_error, map_write_error};
use crate::domain::{
    Employee, EmployeeId, Error, HistoryLog, LedgerBatch, Product, ProductDraft, ProductId,
    ProductPatch, ProductStatus, TransactionId, TransactionOutcome, TransactionReceipt,
};

/// Ledger transactions and read models over a [`LedgerStore`].
#[derive(Clone)]
pub struct InventoryService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> InventoryService<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

fn product_not_found(id: ProductId) -> Error {
    Error::not_found(format!("product {id} not found"))
}

fn fold(operation: &'static str, result: Result<TransactionReceipt, Error>) -> TransactionOutcome {
    match &result {
        Ok(receipt) => info!(operation, message = %receipt.message, "transaction committed"),
        Err(err) => warn!(
            operation,
            code = err.code().as_str(),
            message = %err,
            "transaction rejected"
        ),
    }
    result.into()
}

impl<S> InventoryService<S>
where
    S: LedgerStore,
{
    /// Fetch a row that has not been soft-deleted.
    async fn live_product(&self, id: ProductId) -> Result<Product, Error> {
        self.store
            .find_product(&id)
            .await
            .map_err(map_read_error)?
            .filter(|product| !product.is_deleted())
            .ok_or_else(|| product_not_found(id))
    }

    async fn employee(&self, id: EmployeeId) -> Result<Employee, Error> {
        self.store
            .find_employee(&id)
            .await
            .map_err(map_read_error)?
            .ok_or_else(|| Error::not_found(format!("employee {id} not found")))
    }

    async fn commit(&self, batch: &LedgerBatch) -> Result<(), Error> {
        self.store.apply(batch).await.map_err(map_write_error)
    }

    async fn try_create(
        &self,
        draft: ProductDraft,
        admin_name: Option<String>,
    ) -> Result<TransactionReceipt, Error> {
        let (product, batch) = plan_creation(draft, admin_name, self.clock.utc())?;
        self.commit(&batch).await?;
        Ok(
            TransactionReceipt::new(format!("{} registered.", product.title))
                .with_product(product.id),
        )
    }

    async fn try_update(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<TransactionReceipt, Error> {
        let product = self.live_product(id).await?;
        let (updated, batch) = plan_update(&product, patch)?;
        self.commit(&batch).await?;
        Ok(TransactionReceipt::new(format!("{} updated.", updated.title)).with_product(id))
    }

    async fn try_delete(&self, id: ProductId) -> Result<TransactionReceipt, Error> {
        let product = self.live_product(id).await?;
        let batch = plan_deletion(&product, self.clock.utc())?;
        self.commit(&batch).await?;
        Ok(TransactionReceipt::new(format!("{} deleted.", product.title)).with_product(id))
    }

    async fn try_assign(&self, request: AssignRequest) -> Result<TransactionReceipt, Error> {
        let product = self.live_product(request.product_id).await?;
        let employee = self.employee(request.employee_id).await?;
        let terms = AssignmentTerms {
            quantity: request.quantity,
            transaction_id: request.transaction_id.unwrap_or_else(TransactionId::random),
            protocol_signature: request.protocol_signature,
            admin_name: request.admin_name,
        };
        let quantity = terms.quantity;
        let plan = plan_assignment(&product, &employee, terms, self.clock.utc())?;
        self.commit(&plan.batch).await?;

        let message = match plan.kind {
            AssignmentKind::Consumed => format!(
                "{} consumed {quantity} unit(s) of {}.",
                employee.name, product.title
            ),
            AssignmentKind::Full => format!("{} assigned to {}.", product.title, employee.name),
            AssignmentKind::Split { .. } => format!(
                "{quantity} unit(s) of {} assigned to {}.",
                product.title, employee.name
            ),
        };
        Ok(TransactionReceipt::new(message)
            .with_product(plan.product_id)
            .with_transaction(Some(plan.transaction_id)))
    }

    async fn try_return(&self, product_id: ProductId) -> Result<TransactionReceipt, Error> {
        let product = self.live_product(product_id).await?;
        let stock = self
            .store
            .list_products(ProductFilter::Status(ProductStatus::InStock))
            .await
            .map_err(map_read_error)?;
        let plan = plan_return(&product, &stock, self.clock.utc())?;
        self.commit(&plan.batch).await?;

        let message = match plan.kind {
            ReturnKind::Merged { .. } => format!(
                "{} returned by {} and merged into existing stock.",
                product.title, plan.holder_name
            ),
            ReturnKind::Restocked => format!(
                "{} returned to stock by {}.",
                product.title, plan.holder_name
            ),
        };
        Ok(TransactionReceipt::new(message)
            .with_product(plan.product_id)
            .with_transaction(plan.transaction_id))
    }

    async fn all_history(&self) -> Result<Vec<HistoryLog>, Error> {
        self.store
            .list_history(HistoryFilter::All)
            .await
            .map_err(map_read_error)
    }
}

#[async_trait]
impl<S> InventoryCommand for InventoryService<S>
where
    S: LedgerStore,
{
    async fn create_product(
        &self,
        draft: ProductDraft,
        admin_name: Option<String>,
    ) -> TransactionOutcome {
        fold("create_product", self.try_create(draft, admin_name).await)
    }

    async fn update_product(&self, id: ProductId, patch: ProductPatch) -> TransactionOutcome {
        fold("update_product", self.try_update(id, patch).await)
    }

    async fn delete_product(&self, id: ProductId) -> TransactionOutcome {
        fold("delete_product", self.try_delete(id).await)
    }

    async fn assign(&self, request: AssignRequest) -> TransactionOutcome {
        fold("assign", self.try_assign(request).await)
    }

    async fn return_item(&self, product_id: ProductId) -> TransactionOutcome {
        fold("return_item", self.try_return(product_id).await)
    }
}

#[async_trait]
impl<S> InventoryQuery for InventoryService<S>
where
    S: LedgerStore,
{
    async fn snapshot(&self) -> Result<InventorySnapshot, Error> {
        let products = self
            .store
            .list_products(ProductFilter::Active)
            .await
            .map_err(map_read_error)?;
        let mut employees = self.store.list_employees().await.map_err(map_read_error)?;
        employees.sort_by(|a, b| a.name.cmp(&b.name));
        let history = global_feed(self.all_history().await?);
        let mut categories = self.store.list_categories().await.map_err(map_read_error)?;
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(InventorySnapshot {
            products,
            employees,
            history,
            categories,
        })
    }

    async fn active_products(&self, search: Option<String>) -> Result<Vec<Product>, Error> {
        let products = self
            .store
            .list_products(ProductFilter::Active)
            .await
            .map_err(map_read_error)?;
        Ok(match search {
            Some(needle) => products
                .into_iter()
                .filter(|product| product.matches_search(&needle))
                .collect(),
            None => products,
        })
    }

    async fn product(&self, id: ProductId) -> Result<Product, Error> {
        self.store
            .find_product(&id)
            .await
            .map_err(map_read_error)?
            .ok_or_else(|| product_not_found(id))
    }

    async fn product_history(&self, id: ProductId) -> Result<Vec<HistoryLog>, Error> {
        let logs = self
            .store
            .list_history(HistoryFilter::Product(id))
            .await
            .map_err(map_read_error)?;
        Ok(product_timeline(id, logs))
    }

    async fn global_history(&self) -> Result<Vec<HistoryEntry>, Error> {
        Ok(global_feed(self.all_history().await?))
    }

    async fn audit_trail(&self, search: Option<String>) -> Result<Vec<AuditEntry>, Error> {
        let logs = self.all_history().await?;
        let products = self
            .store
            .list_products(ProductFilter::All)
            .await
            .map_err(map_read_error)?;
        Ok(audit_trail(logs, &products, search.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    //! Service behaviour against a mocked store; end-to-end flows live in
    //! the integration suite.

    use super::*;
    use crate::domain::ports::{LedgerStoreError, MockLedgerStore};
    use crate::domain::{AssetType, Custody, ErrorCode, LedgerWrite};
    use chrono::{DateTime, Utc};
    use mockable::MockClock;
    use rstest::{fixture, rstest};
    use rust_decimal::Decimal;

    #[fixture]
    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
            .expect("timestamp")
            .with_timezone(&Utc)
    }

    fn clock(now: DateTime<Utc>) -> Arc<dyn Clock> {
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(now);
        Arc::new(clock)
    }

    fn stock(quantity: u32) -> Product {
        Product {
            id: ProductId::random(),
            title: "Headset".to_owned(),
            description: String::new(),
            category: "IT".to_owned(),
            quantity,
            value: Decimal::new(250, 0),
            asset_type: AssetType::Permanent,
            serial_number: None,
            image_url: None,
            custody: Custody::InStock,
        }
    }

    fn employee() -> Employee {
        Employee {
            id: EmployeeId::random(),
            name: "Ana".to_owned(),
            cpf: "1".to_owned(),
            sector: "Ops".to_owned(),
            email: None,
            phone: None,
        }
    }

    fn request(product: &Product, employee: &Employee, quantity: u32) -> AssignRequest {
        AssignRequest {
            product_id: product.id,
            employee_id: employee.id,
            quantity,
            transaction_id: None,
            protocol_signature: None,
            admin_name: None,
        }
    }

    fn store_with(product: &Product, employee: &Employee) -> MockLedgerStore {
        let mut store = MockLedgerStore::new();
        let found = product.clone();
        store
            .expect_find_product()
            .return_once(move |_| Ok(Some(found)));
        let person = employee.clone();
        store
            .expect_find_employee()
            .return_once(move |_| Ok(Some(person)));
        store
    }

    #[rstest]
    #[tokio::test]
    async fn insufficient_quantity_never_touches_the_store(now: DateTime<Utc>) {
        let product = stock(2);
        let employee = employee();
        let mut store = store_with(&product, &employee);
        store.expect_apply().never();
        let service = InventoryService::new(Arc::new(store), clock(now));

        let outcome = service.assign(request(&product, &employee, 3)).await;

        assert!(!outcome.success);
        assert_eq!(outcome.code, Some(ErrorCode::InsufficientQuantity));
    }

    #[rstest]
    #[tokio::test]
    async fn generated_transaction_id_is_reported(now: DateTime<Utc>) {
        let product = stock(1);
        let employee = employee();
        let mut store = store_with(&product, &employee);
        store.expect_apply().times(1).returning(|batch| {
            let Some(LedgerWrite::AppendLog(log)) = batch.writes().last() else {
                panic!("expected trailing log");
            };
            assert!(log.transaction_id.is_some());
            Ok(())
        });
        let service = InventoryService::new(Arc::new(store), clock(now));

        let outcome = service.assign(request(&product, &employee, 1)).await;

        assert!(outcome.success, "{}", outcome.message);
        assert!(outcome.transaction_id.is_some());
        assert_eq!(outcome.product_id, Some(product.id));
    }

    #[rstest]
    #[tokio::test]
    async fn store_write_failures_are_reported_generically(now: DateTime<Utc>) {
        let product = stock(1);
        let employee = employee();
        let mut store = store_with(&product, &employee);
        store
            .expect_apply()
            .times(1)
            .returning(|_| Err(LedgerStoreError::connection("socket closed")));
        let service = InventoryService::new(Arc::new(store), clock(now));

        let outcome = service.assign(request(&product, &employee, 1)).await;

        assert_eq!(outcome.code, Some(ErrorCode::StoreWriteFailure));
        assert!(!outcome.message.contains("socket"));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_product_is_not_found(now: DateTime<Utc>) {
        let mut store = MockLedgerStore::new();
        store.expect_find_product().return_once(|_| Ok(None));
        store.expect_apply().never();
        let service = InventoryService::new(Arc::new(store), clock(now));

        let outcome = service.return_item(ProductId::random()).await;

        assert_eq!(outcome.code, Some(ErrorCode::NotFound));
    }

    #[rstest]
    #[tokio::test]
    async fn soft_deleted_product_cannot_be_deleted_again(now: DateTime<Utc>) {
        let mut product = stock(1);
        product.custody = Custody::Deleted;
        let mut store = MockLedgerStore::new();
        store
            .expect_find_product()
            .return_once(move |_| Ok(Some(product)));
        store.expect_apply().never();
        let service = InventoryService::new(Arc::new(store), clock(now));

        let outcome = service.delete_product(ProductId::random()).await;

        assert_eq!(outcome.code, Some(ErrorCode::NotFound));
    }

    #[rstest]
    #[tokio::test]
    async fn active_products_applies_search(now: DateTime<Utc>) {
        let mut drill = stock(1);
        drill.title = "Drill".to_owned();
        let headset = stock(1);
        let rows = vec![drill, headset];
        let mut store = MockLedgerStore::new();
        store
            .expect_list_products()
            .withf(|filter| *filter == ProductFilter::Active)
            .return_once(move |_| Ok(rows));
        let service = InventoryService::new(Arc::new(store), clock(now));

        let found = service
            .active_products(Some("DRI".to_owned()))
            .await
            .expect("query");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Drill");
    }
}
