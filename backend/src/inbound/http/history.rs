//! Read-side ledger views.
//!
//! ```text
//! GET /api/v1/snapshot          products, employees, feed, categories
//! GET /api/v1/history           global feed, newest first
//! GET /api/v1/audit?search=ana  feed joined with product titles
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    AuditEntryResponse, HistoryEntryResponse, SnapshotResponse, collect,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::normalise_search;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AuditQuery {
    /// Case-insensitive match on actor, action, label or product title.
    pub search: Option<String>,
}

/// Fresh view of the whole ledger, fetched after every mutation.
#[utoipa::path(
    get,
    path = "/api/v1/snapshot",
    responses(
        (status = 200, description = "Ledger snapshot", body = SnapshotResponse),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["history"],
    operation_id = "getSnapshot"
)]
#[get("/snapshot")]
pub async fn snapshot(state: web::Data<HttpState>) -> ApiResult<web::Json<SnapshotResponse>> {
    let snapshot = state.inventory_query.snapshot().await?;
    Ok(web::Json(snapshot.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/history",
    responses(
        (status = 200, description = "Every log, newest first", body = [HistoryEntryResponse]),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["history"],
    operation_id = "listHistory"
)]
#[get("/history")]
pub async fn global_history(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<HistoryEntryResponse>>> {
    let entries = state.inventory_query.global_history().await?;
    Ok(web::Json(collect(entries)))
}

#[utoipa::path(
    get,
    path = "/api/v1/audit",
    params(AuditQuery),
    responses(
        (status = 200, description = "Audit trail", body = [AuditEntryResponse]),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["history"],
    operation_id = "listAuditTrail"
)]
#[get("/audit")]
pub async fn audit_trail(
    state: web::Data<HttpState>,
    query: web::Query<AuditQuery>,
) -> ApiResult<web::Json<Vec<AuditEntryResponse>>> {
    let search = normalise_search(query.into_inner().search);
    let entries = state.inventory_query.audit_trail(search).await?;
    Ok(web::Json(collect(entries)))
}
