//! Category HTTP handlers.
//!
//! ```text
//! GET  /api/v1/categories
//! POST /api/v1/categories {"name":"Periféricos"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{CategoryResponse, collect};
use crate::inbound::http::state::HttpState;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses(
        (status = 200, description = "Categories ordered by name", body = [CategoryResponse]),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["categories"],
    operation_id = "listCategories"
)]
#[get("/categories")]
pub async fn list_categories(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<CategoryResponse>>> {
    let categories = state.directory_query.list_categories().await?;
    Ok(web::Json(collect(categories)))
}

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Blank name", body = Error),
        (status = 409, description = "Name already taken", body = Error)
    ),
    tags = ["categories"],
    operation_id = "createCategory"
)]
#[post("/categories")]
pub async fn create_category(
    state: web::Data<HttpState>,
    payload: web::Json<CreateCategoryRequest>,
) -> ApiResult<HttpResponse> {
    let category = state
        .directory
        .create_category(payload.into_inner().name)
        .await?;
    Ok(HttpResponse::Created().json(CategoryResponse::from(category)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use crate::inbound::http::test_utils::{TestPorts, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[actix_rt::test]
    async fn duplicate_category_is_a_conflict() {
        let mut ports = TestPorts::default();
        ports
            .directory
            .expect_create_category()
            .with(eq("TI".to_owned()))
            .times(1)
            .return_once(|_| Err(Error::conflict("category TI already exists")));
        let app = actix_test::init_service(test_app(ports.into_state())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/categories")
                .set_json(json!({ "name": "TI" }))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[rstest]
    #[actix_rt::test]
    async fn list_serialises_id_and_name() {
        let category = Category::named("TI").expect("valid name");
        let expected_id = category.id;
        let mut ports = TestPorts::default();
        ports
            .directory_query
            .expect_list_categories()
            .times(1)
            .return_once(move || Ok(vec![category]));
        let app = actix_test::init_service(test_app(ports.into_state())).await;

        let body: serde_json::Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/categories")
                .to_request(),
        )
        .await;

        assert_eq!(body, json!([{ "id": expected_id.to_string(), "name": "TI" }]));
    }
}
