//! JSON body posted to the term webhook.
//!
//! Field names follow the camelCase shape the signature workflow consumes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::ports::TermNotification;
use crate::domain::{Employee, Product};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct EmployeeDto<'a> {
    id: String,
    name: &'a str,
    cpf: &'a str,
    sector: &'a str,
    email: Option<&'a str>,
    phone: Option<&'a str>,
}

impl<'a> From<&'a Employee> for EmployeeDto<'a> {
    fn from(employee: &'a Employee) -> Self {
        Self {
            id: employee.id.to_string(),
            name: &employee.name,
            cpf: &employee.cpf,
            sector: &employee.sector,
            email: employee.email.as_deref(),
            phone: employee.phone.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ProductDto<'a> {
    id: String,
    title: &'a str,
    description: &'a str,
    category: &'a str,
    quantity: u32,
    value: Decimal,
    asset_type: &'static str,
    serial_number: Option<&'a str>,
    status: &'static str,
}

impl<'a> From<&'a Product> for ProductDto<'a> {
    fn from(product: &'a Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: &product.title,
            description: &product.description,
            category: &product.category,
            quantity: product.quantity,
            value: product.value,
            asset_type: product.asset_type.as_str(),
            serial_number: product.serial_number.as_deref(),
            status: product.status().as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TermPayload<'a> {
    employee: EmployeeDto<'a>,
    product: ProductDto<'a>,
    admin_name: &'a str,
    pdf_base64: &'a str,
    timestamp: DateTime<Utc>,
}

impl<'a> From<&'a TermNotification> for TermPayload<'a> {
    fn from(notification: &'a TermNotification) -> Self {
        Self {
            employee: EmployeeDto::from(&notification.employee),
            product: ProductDto::from(&notification.product),
            admin_name: &notification.admin_name,
            pdf_base64: &notification.pdf_base64,
            timestamp: notification.timestamp,
        }
    }
}
