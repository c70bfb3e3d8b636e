//! Route definitions for the audit API.

use axum::{routing::get, Router};

use crate::handlers;
use crate::state::AppState;

/// Create the dashboard router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/audit", get(handlers::audit_list))
        .route("/api/audit/stats/logins", get(handlers::login_stats))
        .route("/api/audit/stats/requests", get(handlers::request_stats))
        .route("/api/audit/{id}", get(handlers::audit_get))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::{Duration, TimeZone, Utc};
    use portal_audit::{AuditLog, ManualClock};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn seeded_state() -> (AppState, Arc<AuditLog>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 11, 4, 9, 0, 0).unwrap(),
        ));
        let log = Arc::new(
            AuditLog::with_capacity(100)
                .unwrap()
                .with_clock(clock.clone()),
        );

        log.log_login(Some("u1"), "a@uni.edu.gh", true, None, None);
        clock.advance(Duration::minutes(1));
        log.log_login(None, "ghost@uni.edu.gh", false, None, None);
        clock.advance(Duration::minutes(1));
        log.log_request_created("u1", "req-1", "transcript", true);
        clock.advance(Duration::minutes(1));
        log.log_request_created("u2", "req-2", "certificate", true);
        clock.advance(Duration::minutes(1));
        log.log_request_status_updated("hod-1", "req-1", "pending", "approved");

        (AppState::new(log.clone()), log)
    }

    async fn get_json(state: AppState, uri: &str) -> (StatusCode, Value) {
        let response = create_router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (state, _log) = seeded_state();
        let (status, body) = get_json(state, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["audit_entries"], 5);
        assert_eq!(body["audit_capacity"], 100);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (state, _log) = seeded_state();
        let (status, body) = get_json(state, "/api/audit").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 5);
        assert_eq!(body["has_more"], false);
        assert_eq!(body["entries"][0]["action"], "REQUEST_STATUS_UPDATED");
        assert_eq!(body["entries"][4]["action"], "USER_LOGIN");
    }

    #[tokio::test]
    async fn test_list_filters_and_pagination() {
        let (state, _log) = seeded_state();
        let (_, body) = get_json(state.clone(), "/api/audit?user_id=u1").await;
        assert_eq!(body["total"], 2);

        let (_, body) =
            get_json(state.clone(), "/api/audit?action=USER_LOGIN&success=false").await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["entries"][0]["details"]["email"], "ghost@uni.edu.gh");

        let (_, body) = get_json(
            state.clone(),
            "/api/audit?resource=document_request&resource_id=req-1",
        )
        .await;
        assert_eq!(body["total"], 2);

        let (_, body) = get_json(state, "/api/audit?limit=2&offset=1").await;
        assert_eq!(body["total"], 5);
        assert_eq!(body["entries"].as_array().unwrap().len(), 2);
        assert_eq!(body["has_more"], true);
        assert_eq!(body["entries"][0]["action"], "REQUEST_CREATED");
    }

    #[tokio::test]
    async fn test_list_date_range() {
        let (state, _log) = seeded_state();
        let (status, body) = get_json(
            state.clone(),
            "/api/audit?start_time=2024-11-04T09:01:00Z&end_time=2024-11-04T09:02:00Z",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);

        // An inverted range matches nothing rather than failing.
        let (status, body) = get_json(
            state,
            "/api/audit?start_time=2024-11-04T10:00:00Z&end_time=2024-11-04T09:00:00Z",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);
        assert_eq!(body["entries"], serde_json::json!([]));
        assert_eq!(body["has_more"], false);
    }

    #[tokio::test]
    async fn test_get_entry() {
        let (state, log) = seeded_state();
        let id = log.all_logs()[0].id.clone();

        let (status, body) = get_json(state.clone(), &format!("/api/audit/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], id.as_str());

        let (status, body) = get_json(state, "/api/audit/does-not-exist").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("does-not-exist"));
    }

    #[tokio::test]
    async fn test_login_stats() {
        let (state, _log) = seeded_state();
        let (status, body) =
            get_json(state.clone(), "/api/audit/stats/logins?timeframe=hour").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timeframe"], "hour");
        assert_eq!(body["total"], 2);
        assert_eq!(body["successful"], 1);
        assert_eq!(body["failed"], 1);

        let (_, body) = get_json(state, "/api/audit/stats/logins?timeframe=fortnight").await;
        assert_eq!(body["timeframe"], "day");
    }

    #[tokio::test]
    async fn test_request_stats() {
        let (state, _log) = seeded_state();
        let (status, body) = get_json(state, "/api/audit/stats/requests").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["by_type"]["transcript"], 1);
        assert_eq!(body["by_type"]["certificate"], 1);
        assert_eq!(body["by_status"]["approved"], 1);
    }
}
