use crate::infra::{AppState, InboxEntry, Placement};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use placement_portal::workflows::placement::applications::application_router;
use placement_portal::workflows::placement::eligibility::post_hire_router;
use placement_portal::workflows::placement::supervision::supervision_router;
use placement_portal::workflows::placement::NotificationSink;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_placement_routes<N>(placement: &Placement<N>) -> Router
where
    N: NotificationSink + 'static,
{
    supervision_router(Arc::clone(&placement.supervision))
        .merge(application_router(Arc::clone(&placement.applications)))
        .merge(post_hire_router(Arc::clone(&placement.post_hire)))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/users/:user_id/notifications",
            get(inbox_endpoint),
        )
        .route(
            "/api/v1/users/:user_id/notifications/:notification_id/read",
            post(mark_read_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn inbox_endpoint(
    Extension(state): Extension<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<InboxEntry>> {
    let mut entries = state.inbox.for_user(&user_id);
    entries.reverse();
    Json(entries)
}

pub(crate) async fn mark_read_endpoint(
    Extension(state): Extension<AppState>,
    Path((user_id, notification_id)): Path<(String, u64)>,
) -> impl IntoResponse {
    if state.inbox.mark_read(&user_id, notification_id) {
        (StatusCode::OK, Json(json!({ "id": notification_id, "read": true })))
    } else {
        let message = format!("notification {notification_id} not found for {user_id}");
        (StatusCode::NOT_FOUND, Json(json!({ "error": message })))
    }
}
