use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Extension;
use axum::Json;
use credit_approval::workflows::lending::{
    lending_router, CustomerRepository, LendingService, LoanRepository,
};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Lending API plus the health, readiness and metrics endpoints.
pub(crate) fn with_lending_routes<C, L>(service: Arc<LendingService<C, L>>) -> axum::Router
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    lending_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Ready once the listener is bound and startup ingestion has finished.
pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    if state.readiness.load(Ordering::Acquire) {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "initializing" })),
        )
    }
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
