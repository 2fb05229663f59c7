//! In-process `LedgerStore` used when no database is configured.
//!
//! Tables live behind one `RwLock`. A batch is applied to a copy of the
//! tables which replaces the live copy only when every write succeeded, so
//! readers never observe a partial batch.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{HistoryFilter, LedgerStore, LedgerStoreError, ProductFilter};
use crate::domain::{
    Category, ContractId, Employee, EmployeeId, HistoryLog, LedgerBatch, LedgerWrite,
    Product, ProductId, SignedContract,
};

#[derive(Debug, Clone, Default)]
struct Tables {
    products: BTreeMap<ProductId, Product>,
    employees: BTreeMap<EmployeeId, Employee>,
    /// Append order.
    history: Vec<HistoryLog>,
    categories: Vec<Category>,
    contracts: BTreeMap<ContractId, SignedContract>,
}

fn missing(write: &LedgerWrite, id: impl ToString) -> LedgerStoreError {
    LedgerStoreError::missing_row(write.label(), id.to_string())
}

fn duplicate(table: &str, id: impl ToString) -> LedgerStoreError {
    LedgerStoreError::constraint(format!("{table} already contains {}", id.to_string()))
}

impl Tables {
    fn apply(&mut self, write: &LedgerWrite) -> Result<(), LedgerStoreError> {
        match write {
            LedgerWrite::InsertProduct(product) => {
                if self.products.contains_key(&product.id) {
                    return Err(duplicate("products", product.id));
                }
                self.products.insert(product.id, product.clone());
            }
            LedgerWrite::UpdateProduct(product) => {
                let row = self
                    .products
                    .get_mut(&product.id)
                    .ok_or_else(|| missing(write, product.id))?;
                *row = product.clone();
            }
            LedgerWrite::SetCustody {
                product_id,
                expected,
                custody,
            } => {
                let row = self
                    .products
                    .get_mut(product_id)
                    .filter(|row| row.status() == *expected)
                    .ok_or_else(|| missing(write, product_id))?;
                row.custody = custody.clone();
            }
            LedgerWrite::AdjustQuantity { product_id, delta } => {
                let row = self
                    .products
                    .get_mut(product_id)
                    .ok_or_else(|| missing(write, product_id))?;
                let adjusted = i64::from(row.quantity) + delta;
                row.quantity = u32::try_from(adjusted).map_err(|_| {
                    LedgerStoreError::constraint(format!(
                        "quantity of {product_id} would become {adjusted}"
                    ))
                })?;
            }
            LedgerWrite::DeleteProduct(id) => {
                self.products
                    .remove(id)
                    .ok_or_else(|| missing(write, id))?;
            }
            LedgerWrite::AppendLog(log) => self.history.push(log.clone()),
            LedgerWrite::RepointLogs { from, to } => {
                for log in self
                    .history
                    .iter_mut()
                    .filter(|log| log.product_id == Some(*from))
                {
                    log.product_id = Some(*to);
                }
            }
            LedgerWrite::InsertEmployee(employee) => {
                if self.employees.contains_key(&employee.id) {
                    return Err(duplicate("employees", employee.id));
                }
                self.employees.insert(employee.id, employee.clone());
            }
            LedgerWrite::UpdateEmployee(employee) => {
                let row = self
                    .employees
                    .get_mut(&employee.id)
                    .ok_or_else(|| missing(write, employee.id))?;
                *row = employee.clone();
            }
            LedgerWrite::DeleteEmployee(id) => {
                self.employees
                    .remove(id)
                    .ok_or_else(|| missing(write, id))?;
            }
            LedgerWrite::InsertCategory(category) => {
                if self.categories.iter().any(|c| c.name == category.name) {
                    return Err(duplicate("categories", &category.name));
                }
                self.categories.push(category.clone());
            }
            LedgerWrite::InsertContract(contract) => {
                if self.contracts.contains_key(&contract.id) {
                    return Err(duplicate("signed_contracts", contract.id));
                }
                self.contracts.insert(contract.id, contract.clone());
            }
            LedgerWrite::DeleteContract(id) => {
                self.contracts
                    .remove(id)
                    .ok_or_else(|| missing(write, id))?;
            }
        }
        Ok(())
    }
}

/// Volatile ledger store; state is lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    tables: RwLock<Tables>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the given rows.
    pub fn seeded(products: Vec<Product>, employees: Vec<Employee>) -> Self {
        let tables = Tables {
            products: products.into_iter().map(|p| (p.id, p)).collect(),
            employees: employees.into_iter().map(|e| (e.id, e)).collect(),
            ..Tables::default()
        };
        Self {
            tables: RwLock::new(tables),
        }
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, LedgerStoreError> {
        Ok(self.tables.read().await.products.get(id).cloned())
    }

    async fn list_products(
        &self,
        filter: ProductFilter,
    ) -> Result<Vec<Product>, LedgerStoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Product> = tables
            .products
            .values()
            .filter(|product| filter.matches(product))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn find_employee(&self, id: &EmployeeId) -> Result<Option<Employee>, LedgerStoreError> {
        Ok(self.tables.read().await.employees.get(id).cloned())
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, LedgerStoreError> {
        Ok(self.tables.read().await.employees.values().cloned().collect())
    }

    async fn list_history(
        &self,
        filter: HistoryFilter,
    ) -> Result<Vec<HistoryLog>, LedgerStoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .history
            .iter()
            .filter(|log| filter.matches(log))
            .cloned()
            .collect())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, LedgerStoreError> {
        Ok(self.tables.read().await.categories.clone())
    }

    async fn find_contract(
        &self,
        id: &ContractId,
    ) -> Result<Option<SignedContract>, LedgerStoreError> {
        Ok(self.tables.read().await.contracts.get(id).cloned())
    }

    async fn list_contracts(&self) -> Result<Vec<SignedContract>, LedgerStoreError> {
        Ok(self.tables.read().await.contracts.values().cloned().collect())
    }

    async fn apply(&self, batch: &LedgerBatch) -> Result<(), LedgerStoreError> {
        let mut guard = self.tables.write().await;
        let mut staged = guard.clone();
        for write in batch.writes() {
            staged.apply(write)?;
        }
        *guard = staged;
        Ok(())
    }
}
