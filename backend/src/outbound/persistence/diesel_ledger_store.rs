//! PostgreSQL-backed `LedgerStore` implementation using Diesel ORM.
//!
//! Batches run inside one database transaction. Writes that must touch an
//! existing row check the affected-row count and abort the transaction with
//! `MissingRow` when nothing matched.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{HistoryFilter, LedgerStore, LedgerStoreError, ProductFilter};
use crate::domain::{
    Category, ContractId, Employee, EmployeeId, HistoryLog, LedgerBatch, LedgerWrite, Product,
    ProductId, ProductStatus, SignedContract,
};

use super::diesel_ledger_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    CategoryRow, EmployeeRow, HistoryLogRow, NewHistoryLogRow, ProductRow, SignedContractRow,
};
use super::pool::DbPool;
use super::schema::{categories, employees, history_logs, products, signed_contracts};

/// Diesel-backed implementation of the `LedgerStore` port.
#[derive(Clone)]
pub struct DieselLedgerStore {
    pool: DbPool,
}

impl DieselLedgerStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a batch transaction.
#[derive(Debug)]
enum ApplyError {
    Diesel(DieselError),
    Store(LedgerStoreError),
}

impl From<DieselError> for ApplyError {
    fn from(error: DieselError) -> Self {
        Self::Diesel(error)
    }
}

impl From<ApplyError> for LedgerStoreError {
    fn from(error: ApplyError) -> Self {
        match error {
            ApplyError::Diesel(error) => map_diesel_error(error),
            ApplyError::Store(error) => error,
        }
    }
}

fn expect_one_row(
    affected: usize,
    write: &LedgerWrite,
    id: impl ToString,
) -> Result<(), ApplyError> {
    if affected == 1 {
        Ok(())
    } else {
        Err(ApplyError::Store(LedgerStoreError::missing_row(
            write.label(),
            id.to_string(),
        )))
    }
}

async fn apply_write(conn: &mut AsyncPgConnection, write: &LedgerWrite) -> Result<(), ApplyError> {
    match write {
        LedgerWrite::InsertProduct(product) => {
            let row = ProductRow::from_domain(product).map_err(ApplyError::Store)?;
            diesel::insert_into(products::table)
                .values(&row)
                .execute(conn)
                .await?;
        }
        LedgerWrite::UpdateProduct(product) => {
            let row = ProductRow::from_domain(product).map_err(ApplyError::Store)?;
            let affected = diesel::update(products::table.find(row.id))
                .set(&row)
                .execute(conn)
                .await?;
            expect_one_row(affected, write, product.id)?;
        }
        LedgerWrite::SetCustody {
            product_id,
            expected,
            custody,
        } => {
            let holder = custody.holder();
            let affected = diesel::update(
                products::table
                    .find(product_id.as_uuid())
                    .filter(products::status.eq(expected.as_str())),
            )
            .set((
                products::status.eq(custody.status().as_str()),
                products::assigned_to_id.eq(holder.map(|h| *h.employee_id.as_uuid())),
                products::assigned_to_name.eq(holder.map(|h| h.employee_name.clone())),
                products::current_transaction_id
                    .eq(holder.and_then(|h| h.transaction_id).map(|tx| *tx.as_uuid())),
            ))
            .execute(conn)
            .await?;
            expect_one_row(affected, write, product_id)?;
        }
        LedgerWrite::AdjustQuantity { product_id, delta } => {
            let delta = i32::try_from(*delta).map_err(|_| {
                ApplyError::Store(LedgerStoreError::constraint(format!(
                    "quantity delta {delta} out of range"
                )))
            })?;
            let affected = diesel::update(products::table.find(product_id.as_uuid()))
                .set(products::quantity.eq(products::quantity + delta))
                .execute(conn)
                .await?;
            expect_one_row(affected, write, product_id)?;
        }
        LedgerWrite::DeleteProduct(id) => {
            let affected = diesel::delete(products::table.find(id.as_uuid()))
                .execute(conn)
                .await?;
            expect_one_row(affected, write, id)?;
        }
        LedgerWrite::AppendLog(log) => {
            diesel::insert_into(history_logs::table)
                .values(NewHistoryLogRow::from(log))
                .execute(conn)
                .await?;
        }
        LedgerWrite::RepointLogs { from, to } => {
            diesel::update(history_logs::table.filter(history_logs::product_id.eq(from.as_uuid())))
                .set(history_logs::product_id.eq(to.as_uuid()))
                .execute(conn)
                .await?;
        }
        LedgerWrite::InsertEmployee(employee) => {
            diesel::insert_into(employees::table)
                .values(EmployeeRow::from(employee))
                .execute(conn)
                .await?;
        }
        LedgerWrite::UpdateEmployee(employee) => {
            let row = EmployeeRow::from(employee);
            let affected = diesel::update(employees::table.find(row.id))
                .set(&row)
                .execute(conn)
                .await?;
            expect_one_row(affected, write, employee.id)?;
        }
        LedgerWrite::DeleteEmployee(id) => {
            let affected = diesel::delete(employees::table.find(id.as_uuid()))
                .execute(conn)
                .await?;
            expect_one_row(affected, write, id)?;
        }
        LedgerWrite::InsertCategory(category) => {
            diesel::insert_into(categories::table)
                .values(CategoryRow::from(category))
                .execute(conn)
                .await?;
        }
        LedgerWrite::InsertContract(contract) => {
            diesel::insert_into(signed_contracts::table)
                .values(SignedContractRow::from(contract))
                .execute(conn)
                .await?;
        }
        LedgerWrite::DeleteContract(id) => {
            let affected = diesel::delete(signed_contracts::table.find(id.as_uuid()))
                .execute(conn)
                .await?;
            expect_one_row(affected, write, id)?;
        }
    }
    Ok(())
}

fn collect_rows<R, T>(
    rows: Vec<R>,
    decode: impl Fn(R) -> Result<T, LedgerStoreError>,
) -> Result<Vec<T>, LedgerStoreError> {
    rows.into_iter().map(decode).collect()
}

#[async_trait]
impl LedgerStore for DieselLedgerStore {
    async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, LedgerStoreError> {
        let mut conn = self.pool.connection().await.map_err(map_pool_error)?;
        let row: Option<ProductRow> = products::table
            .find(id.as_uuid())
            .select(ProductRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(ProductRow::into_domain).transpose()
    }

    async fn list_products(
        &self,
        filter: ProductFilter,
    ) -> Result<Vec<Product>, LedgerStoreError> {
        let mut conn = self.pool.connection().await.map_err(map_pool_error)?;
        let mut query = products::table
            .select(ProductRow::as_select())
            .order_by((products::title, products::id))
            .into_boxed();
        query = match filter {
            ProductFilter::All => query,
            ProductFilter::Active => {
                query.filter(products::status.ne(ProductStatus::Deleted.as_str()))
            }
            ProductFilter::Status(status) => query.filter(products::status.eq(status.as_str())),
            ProductFilter::AssignedTo(employee_id) => query
                .filter(products::status.eq(ProductStatus::Assigned.as_str()))
                .filter(products::assigned_to_id.eq(*employee_id.as_uuid())),
        };
        let rows: Vec<ProductRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        collect_rows(rows, ProductRow::into_domain)
    }

    async fn find_employee(&self, id: &EmployeeId) -> Result<Option<Employee>, LedgerStoreError> {
        let mut conn = self.pool.connection().await.map_err(map_pool_error)?;
        let row: Option<EmployeeRow> = employees::table
            .find(id.as_uuid())
            .select(EmployeeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Employee::from))
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, LedgerStoreError> {
        let mut conn = self.pool.connection().await.map_err(map_pool_error)?;
        let rows: Vec<EmployeeRow> = employees::table
            .select(EmployeeRow::as_select())
            .order_by((employees::name, employees::id))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn list_history(
        &self,
        filter: HistoryFilter,
    ) -> Result<Vec<HistoryLog>, LedgerStoreError> {
        let mut conn = self.pool.connection().await.map_err(map_pool_error)?;
        let mut query = history_logs::table
            .select(HistoryLogRow::as_select())
            .order_by(history_logs::seq)
            .into_boxed();
        if let HistoryFilter::Product(id) = filter {
            query = query.filter(history_logs::product_id.eq(*id.as_uuid()));
        }
        let rows: Vec<HistoryLogRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        collect_rows(rows, HistoryLogRow::into_domain)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, LedgerStoreError> {
        let mut conn = self.pool.connection().await.map_err(map_pool_error)?;
        let rows: Vec<CategoryRow> = categories::table
            .select(CategoryRow::as_select())
            .order_by(categories::name)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_contract(
        &self,
        id: &ContractId,
    ) -> Result<Option<SignedContract>, LedgerStoreError> {
        let mut conn = self.pool.connection().await.map_err(map_pool_error)?;
        let row: Option<SignedContractRow> = signed_contracts::table
            .find(id.as_uuid())
            .select(SignedContractRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(SignedContractRow::into_domain).transpose()
    }

    async fn list_contracts(&self) -> Result<Vec<SignedContract>, LedgerStoreError> {
        let mut conn = self.pool.connection().await.map_err(map_pool_error)?;
        let rows: Vec<SignedContractRow> = signed_contracts::table
            .select(SignedContractRow::as_select())
            .order_by(signed_contracts::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, SignedContractRow::into_domain)
    }

    async fn apply(&self, batch: &LedgerBatch) -> Result<(), LedgerStoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut pooled = self.pool.connection().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        conn.transaction(|conn| {
            async move {
                for write in batch.writes() {
                    apply_write(conn, write).await?;
                }
                Ok::<(), ApplyError>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(LedgerStoreError::from)?;
        debug!(writes = ?batch.labels(), "ledger batch committed");
        Ok(())
    }
}
