//! Request handlers for the audit API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use portal_audit::{AuditLogEntry, LoginTimeframe, RequestStatistics};
use serde_json::json;

use crate::api_types::{AuditListResponse, AuditQueryParams, LoginStatsParams, LoginStatsResponse};
use crate::error::DashboardError;
use crate::state::AppState;

/// Liveness probe.
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let log = state.audit_log();
    Json(json!({
        "ok": true,
        "service": "portal-dashboard",
        "audit_entries": log.len(),
        "audit_capacity": log.capacity(),
    }))
}

/// List audit entries matching the query parameters, newest first.
pub async fn audit_list(
    State(state): State<AppState>,
    Query(params): Query<AuditQueryParams>,
) -> Json<AuditListResponse> {
    let log = state.audit_log();
    let matched = log.query(&params.to_filter());
    let total = matched.len();

    let page = params.to_page();
    let entries = page.paginate(matched);
    let has_more = page.offset.unwrap_or(0) + entries.len() < total;

    Json(AuditListResponse {
        entries,
        total,
        has_more,
        capacity: log.capacity(),
    })
}

/// Get a single audit entry.
pub async fn audit_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AuditLogEntry>, DashboardError> {
    state
        .audit_log()
        .get(&id)
        .map(Json)
        .ok_or_else(|| DashboardError::NotFound(format!("audit entry {}", id)))
}

/// Login attempt counts over a trailing window.
pub async fn login_stats(
    State(state): State<AppState>,
    Query(params): Query<LoginStatsParams>,
) -> Json<LoginStatsResponse> {
    let timeframe = params
        .timeframe
        .as_deref()
        .map(LoginTimeframe::parse_lenient)
        .unwrap_or_default();

    Json(LoginStatsResponse {
        timeframe,
        stats: state.audit_log().login_attempts(timeframe),
    })
}

/// Document request counts by type and by status reached.
pub async fn request_stats(State(state): State<AppState>) -> Json<RequestStatistics> {
    Json(state.audit_log().request_statistics())
}
