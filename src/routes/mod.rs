pub mod reports;
pub mod reservations;

use axum::{extract::Extension, response::Json as RespJson, routing::get, Router};

use crate::context::AppContext;
use reports::report_router;
use reservations::reservation_router;

// Liveness check
async fn health() -> RespJson<serde_json::Value> {
    RespJson(serde_json::json!({
        "status": "ok",
        "message": "Dispatch API is working",
        "timestamp": chrono::Utc::now()
    }))
}

/// Every API route with the shared context attached.
pub fn api_router(ctx: AppContext) -> Router {
    Router::new()
        // Reservation month views, groups and batch operations
        .merge(reservation_router())
        // Monthly driving log
        .merge(report_router())
        .route("/api/health", get(health))
        .layer(Extension(ctx))
}
