//! HTTP inbound adapter exposing the ledger REST endpoints.

use actix_web::web;

pub mod categories;
pub mod contracts;
pub mod employees;
pub mod error;
pub mod health;
pub mod history;
pub mod products;
pub mod schemas;
pub mod state;
pub mod terms;
#[cfg(test)]
pub mod test_utils;
mod validation;

pub use error::ApiResult;

/// JSON bodies carry base64 contract files of up to 5 MiB.
pub const MAX_JSON_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Register every `/api/v1` handler on `cfg`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use inventory::inbound::http::configure;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(MAX_JSON_BODY_BYTES))
        .service(history::snapshot)
        .service(history::global_history)
        .service(history::audit_trail)
        .service(products::list_products)
        .service(products::create_product)
        .service(products::get_product)
        .service(products::update_product)
        .service(products::delete_product)
        .service(products::product_history)
        .service(products::assign_product)
        .service(products::return_product)
        .service(employees::list_employees)
        .service(employees::create_employee)
        .service(employees::find_employee_by_email)
        .service(employees::update_employee)
        .service(employees::delete_employee)
        .service(employees::employee_assets)
        .service(categories::list_categories)
        .service(categories::create_category)
        .service(contracts::list_contracts)
        .service(contracts::upload_contract)
        .service(contracts::import_legacy_contract)
        .service(contracts::delete_contract)
        .service(terms::dispatch_term);
}
