//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
pub mod migrations;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::InventorySettings;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use inventory::Trace;
#[cfg(debug_assertions)]
use inventory::doc::ApiDoc;
use inventory::inbound::http::configure;
use inventory::inbound::http::health::{HealthState, live, ready};
use inventory::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(configure))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when the blob root cannot be opened, the
/// webhook client cannot be built or the socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config)?;

    #[cfg(feature = "metrics")]
    let prometheus = metrics::make_metrics()?;

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(prometheus.clone());

        app
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use inventory::domain::TRACE_ID_HEADER;
    use rstest::rstest;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    fn memory_deps(temp: &TempDir) -> AppDependencies {
        let config = ServerConfig::new(
            "127.0.0.1:0".parse().expect("addr"),
            temp.path().join("blobs"),
            "http://localhost/files/".parse().expect("url"),
        );
        AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: build_http_state(&config).expect("state"),
        }
    }

    #[rstest]
    #[actix_rt::test]
    async fn create_then_snapshot_round_trips_through_memory_store() {
        let temp = TempDir::new().expect("temp dir");
        let app = test::init_service(build_app(memory_deps(&temp))).await;

        let created = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/products")
                .set_json(json!({
                    "title": "Laptop",
                    "category": "IT",
                    "quantity": 1,
                    "value": "3500.00",
                    "assetType": "PERMANENT"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        assert!(created.headers().contains_key(TRACE_ID_HEADER));

        let snapshot: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/v1/snapshot").to_request(),
        )
        .await;
        assert_eq!(snapshot["products"][0]["title"], "Laptop");
        assert_eq!(snapshot["history"][0]["log"]["action"], "CREATED");
    }

    #[rstest]
    #[actix_rt::test]
    async fn term_dispatch_without_webhook_is_unavailable() {
        let temp = TempDir::new().expect("temp dir");
        let app = test::init_service(build_app(memory_deps(&temp))).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/terms")
                .set_json(json!({
                    "productId": uuid::Uuid::new_v4().to_string(),
                    "employeeId": uuid::Uuid::new_v4().to_string(),
                    "adminName": "Root",
                    "pdfBase64": "JVBERi0="
                }))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
