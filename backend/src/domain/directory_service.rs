//! Employee and category maintenance.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{DirectoryCommand, DirectoryQuery, LedgerStore, ProductFilter};
use crate::domain::store_errors::{map_read_error, map_write_error};
use crate::domain::{
    Category, Employee, EmployeeDraft, EmployeeId, EmployeePatch, EmployeeValidationError, Error,
    LedgerBatch, LedgerWrite, Product,
};

#[derive(Clone)]
pub struct DirectoryService<S> {
    store: Arc<S>,
}

impl<S> DirectoryService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

fn invalid_employee(err: EmployeeValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(serde_json::json!({ "field": err.field }))
}

impl<S> DirectoryService<S>
where
    S: LedgerStore,
{
    async fn existing_employee(&self, id: EmployeeId) -> Result<Employee, Error> {
        self.store
            .find_employee(&id)
            .await
            .map_err(map_read_error)?
            .ok_or_else(|| Error::not_found(format!("employee {id} not found")))
    }

    async fn held_by(&self, id: EmployeeId) -> Result<Vec<Product>, Error> {
        self.store
            .list_products(ProductFilter::AssignedTo(id))
            .await
            .map_err(map_read_error)
    }

    async fn commit(&self, write: LedgerWrite) -> Result<(), Error> {
        self.store
            .apply(&LedgerBatch::new().with(write))
            .await
            .map_err(map_write_error)
    }
}

#[async_trait]
impl<S> DirectoryCommand for DirectoryService<S>
where
    S: LedgerStore,
{
    async fn create_employee(&self, draft: EmployeeDraft) -> Result<Employee, Error> {
        let employee = draft.into_employee().map_err(invalid_employee)?;
        self.commit(LedgerWrite::InsertEmployee(employee.clone()))
            .await?;
        info!(employee_id = %employee.id, "employee registered");
        Ok(employee)
    }

    async fn update_employee(
        &self,
        id: EmployeeId,
        patch: EmployeePatch,
    ) -> Result<Employee, Error> {
        let current = self.existing_employee(id).await?;
        let updated = patch.apply_to(&current).map_err(invalid_employee)?;
        self.commit(LedgerWrite::UpdateEmployee(updated.clone()))
            .await?;
        Ok(updated)
    }

    async fn delete_employee(&self, id: EmployeeId) -> Result<(), Error> {
        let employee = self.existing_employee(id).await?;
        let held = self.held_by(id).await?;
        if !held.is_empty() {
            return Err(Error::conflict(format!(
                "{} still holds {} asset(s); return them first.",
                employee.name,
                held.len()
            ))
            .with_details(serde_json::json!({ "heldAssets": held.len() })));
        }
        self.commit(LedgerWrite::DeleteEmployee(id)).await?;
        info!(employee_id = %id, "employee removed");
        Ok(())
    }

    async fn create_category(&self, name: String) -> Result<Category, Error> {
        let category = Category::named(&name)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let existing = self
            .store
            .list_categories()
            .await
            .map_err(map_read_error)?;
        if existing.iter().any(|other| other.name == category.name) {
            return Err(Error::conflict(format!(
                "category {} already exists",
                category.name
            )));
        }
        self.commit(LedgerWrite::InsertCategory(category.clone()))
            .await?;
        Ok(category)
    }
}

#[async_trait]
impl<S> DirectoryQuery for DirectoryService<S>
where
    S: LedgerStore,
{
    async fn list_employees(&self) -> Result<Vec<Employee>, Error> {
        let mut employees = self.store.list_employees().await.map_err(map_read_error)?;
        employees.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(employees)
    }

    async fn find_employee_by_email(&self, email: String) -> Result<Employee, Error> {
        let employees = self.store.list_employees().await.map_err(map_read_error)?;
        employees
            .into_iter()
            .find(|employee| employee.has_email(&email))
            .ok_or_else(|| Error::not_found("no employee is registered with that e-mail"))
    }

    async fn assets_held_by(&self, id: EmployeeId) -> Result<Vec<Product>, Error> {
        self.existing_employee(id).await?;
        self.held_by(id).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, Error> {
        let mut categories = self.store.list_categories().await.map_err(map_read_error)?;
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockLedgerStore;
    use crate::domain::{AssetType, CategoryId, Custody, ErrorCode, Holder, ProductId};
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn employee(name: &str, email: Option<&str>) -> Employee {
        Employee {
            id: EmployeeId::random(),
            name: name.to_owned(),
            cpf: "123".to_owned(),
            sector: "Ops".to_owned(),
            email: email.map(str::to_owned),
            phone: None,
        }
    }

    fn held_laptop(holder: &Employee) -> Product {
        Product {
            id: ProductId::random(),
            title: "Laptop".to_owned(),
            description: String::new(),
            category: "IT".to_owned(),
            quantity: 1,
            value: Decimal::new(4000, 0),
            asset_type: AssetType::Permanent,
            serial_number: None,
            image_url: None,
            custody: Custody::Assigned(Holder {
                employee_id: holder.id,
                employee_name: holder.name.clone(),
                transaction_id: None,
            }),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn refuses_to_delete_employee_holding_assets() {
        let ana = employee("Ana", None);
        let laptop = held_laptop(&ana);
        let mut store = MockLedgerStore::new();
        let found = ana.clone();
        store
            .expect_find_employee()
            .return_once(move |_| Ok(Some(found)));
        store
            .expect_list_products()
            .return_once(move |_| Ok(vec![laptop]));
        store.expect_apply().never();
        let service = DirectoryService::new(Arc::new(store));

        let err = service
            .delete_employee(ana.id)
            .await
            .expect_err("holder cannot be removed");

        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn deletes_employee_without_assets() {
        let ana = employee("Ana", None);
        let id = ana.id;
        let mut store = MockLedgerStore::new();
        store
            .expect_find_employee()
            .return_once(move |_| Ok(Some(ana)));
        store.expect_list_products().return_once(|_| Ok(Vec::new()));
        store
            .expect_apply()
            .withf(move |batch| batch.writes() == [LedgerWrite::DeleteEmployee(id)])
            .times(1)
            .returning(|_| Ok(()));
        let service = DirectoryService::new(Arc::new(store));

        service.delete_employee(id).await.expect("deleted");
    }

    #[rstest]
    #[case("ana@example.com")]
    #[case("  ANA@Example.com ")]
    #[tokio::test]
    async fn finds_employee_by_email_ignoring_case(#[case] lookup: &str) {
        let rows = vec![
            employee("Bruno", Some("bruno@example.com")),
            employee("Ana", Some("ana@example.com")),
        ];
        let mut store = MockLedgerStore::new();
        store.expect_list_employees().return_once(move || Ok(rows));
        let service = DirectoryService::new(Arc::new(store));

        let found = service
            .find_employee_by_email(lookup.to_owned())
            .await
            .expect("match");

        assert_eq!(found.name, "Ana");
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_category_is_a_conflict() {
        let mut store = MockLedgerStore::new();
        store.expect_list_categories().return_once(|| {
            Ok(vec![Category {
                id: CategoryId::random(),
                name: "Tools".to_owned(),
            }])
        });
        store.expect_apply().never();
        let service = DirectoryService::new(Arc::new(store));

        let err = service
            .create_category(" Tools ".to_owned())
            .await
            .expect_err("duplicate");

        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn blank_employee_name_reports_field() {
        let store = MockLedgerStore::new();
        let service = DirectoryService::new(Arc::new(store));
        let draft = EmployeeDraft {
            name: "  ".to_owned(),
            cpf: "1".to_owned(),
            sector: "Ops".to_owned(),
            email: None,
            phone: None,
        };

        let err = service.create_employee(draft).await.expect_err("invalid");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            err.details(),
            Some(&serde_json::json!({ "field": "name" }))
        );
    }
}
