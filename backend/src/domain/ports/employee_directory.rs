//! Driving ports for employees and categories.

use async_trait::async_trait;

use crate::domain::{
    Category, Employee, EmployeeDraft, EmployeeId, EmployeePatch, Error, Product,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryCommand: Send + Sync {
    async fn create_employee(&self, draft: EmployeeDraft) -> Result<Employee, Error>;

    async fn update_employee(&self, id: EmployeeId, patch: EmployeePatch)
    -> Result<Employee, Error>;

    /// Rejected with `Conflict` while the employee holds assets.
    async fn delete_employee(&self, id: EmployeeId) -> Result<(), Error>;

    async fn create_category(&self, name: String) -> Result<Category, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryQuery: Send + Sync {
    /// Sorted by name.
    async fn list_employees(&self) -> Result<Vec<Employee>, Error>;

    async fn find_employee_by_email(&self, email: String) -> Result<Employee, Error>;

    /// Rows currently assigned to the employee.
    async fn assets_held_by(&self, id: EmployeeId) -> Result<Vec<Product>, Error>;

    /// Sorted by name.
    async fn list_categories(&self) -> Result<Vec<Category>, Error>;
}
