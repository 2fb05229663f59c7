//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::Trace;
use crate::domain::ports::{
    MockContractArchive, MockDirectoryCommand, MockDirectoryQuery, MockInventoryCommand,
    MockInventoryQuery, MockTermDispatch,
};
use crate::inbound::http::state::HttpState;

/// Mocked driving ports; set expectations, then call [`TestPorts::into_state`].
#[derive(Default)]
pub struct TestPorts {
    pub inventory: MockInventoryCommand,
    pub inventory_query: MockInventoryQuery,
    pub directory: MockDirectoryCommand,
    pub directory_query: MockDirectoryQuery,
    pub contracts: MockContractArchive,
    pub terms: MockTermDispatch,
}

impl TestPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            inventory: Arc::new(self.inventory),
            inventory_query: Arc::new(self.inventory_query),
            directory: Arc::new(self.directory),
            directory_query: Arc::new(self.directory_query),
            contracts: Arc::new(self.contracts),
            terms: Arc::new(self.terms),
        })
    }
}

/// App wrapped in the trace middleware with every API route mounted.
pub fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(super::configure))
}
