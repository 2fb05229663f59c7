//! Employees who may hold assets.

use super::EmployeeId;
use super::product::normalise_optional;

/// A person products can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    /// Brazilian taxpayer number, stored as entered.
    pub cpf: String,
    pub sector: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Employee {
    /// Case-insensitive comparison against the stored e-mail address.
    pub fn has_email(&self, email: &str) -> bool {
        self.email
            .as_deref()
            .is_some_and(|stored| stored.trim().eq_ignore_ascii_case(email.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} must not be blank")]
pub struct EmployeeValidationError {
    pub field: &'static str,
}

fn required(value: String, field: &'static str) -> Result<String, EmployeeValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EmployeeValidationError { field });
    }
    Ok(trimmed.to_owned())
}

/// Input for registering an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeDraft {
    pub name: String,
    pub cpf: String,
    pub sector: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl EmployeeDraft {
    pub fn into_employee(self) -> Result<Employee, EmployeeValidationError> {
        Ok(Employee {
            id: EmployeeId::random(),
            name: required(self.name, "name")?,
            cpf: required(self.cpf, "cpf")?,
            sector: required(self.sector, "sector")?,
            email: normalise_optional(self.email),
            phone: normalise_optional(self.phone),
        })
    }
}

/// Partial employee update; `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub sector: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
}

impl EmployeePatch {
    pub fn apply_to(self, employee: &Employee) -> Result<Employee, EmployeeValidationError> {
        let mut updated = employee.clone();
        if let Some(name) = self.name {
            updated.name = required(name, "name")?;
        }
        if let Some(cpf) = self.cpf {
            updated.cpf = required(cpf, "cpf")?;
        }
        if let Some(sector) = self.sector {
            updated.sector = required(sector, "sector")?;
        }
        if let Some(email) = self.email {
            updated.email = normalise_optional(email);
        }
        if let Some(phone) = self.phone {
            updated.phone = normalise_optional(phone);
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn draft() -> EmployeeDraft {
        EmployeeDraft {
            name: " Ana Souza ".to_owned(),
            cpf: "123.456.789-00".to_owned(),
            sector: "Operations".to_owned(),
            email: Some("Ana@Example.com".to_owned()),
            phone: Some(String::new()),
        }
    }

    #[rstest]
    fn draft_trims_and_drops_blank_optionals() {
        let employee = draft().into_employee().expect("valid draft");
        assert_eq!(employee.name, "Ana Souza");
        assert!(employee.phone.is_none());
    }

    #[rstest]
    fn draft_requires_sector() {
        let mut input = draft();
        input.sector = "  ".to_owned();
        assert_eq!(
            input.into_employee(),
            Err(EmployeeValidationError { field: "sector" })
        );
    }

    #[rstest]
    #[case("ana@example.com", true)]
    #[case(" ANA@EXAMPLE.COM", true)]
    #[case("bruno@example.com", false)]
    fn email_lookup_ignores_case(#[case] probe: &str, #[case] expected: bool) {
        let employee = draft().into_employee().expect("valid draft");
        assert_eq!(employee.has_email(probe), expected);
    }

    #[rstest]
    fn patch_clears_email() {
        let employee = draft().into_employee().expect("valid draft");
        let patch = EmployeePatch {
            email: Some(None),
            ..EmployeePatch::default()
        };
        let updated = patch.apply_to(&employee).expect("valid patch");
        assert!(updated.email.is_none());
        assert_eq!(updated.id, employee.id);
    }
}
