use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::billing::api;

async fn health() -> Json<Value> {
    Json(json!({ "status": "up" }))
}

/// Engine-backed routes; callers layer an `Extension<BillingEngine>` on top.
pub fn api_routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/billing/users/:user_id", get(api::monthly_bill))
        .route(
            "/api/billing/users/:user_id/pending",
            get(api::pending_balance),
        )
        .route("/api/billing/users/:user_id/full", get(api::full_bill))
        .route("/api/billing/drafts", get(api::payment_drafts))
        .route("/api/indents", get(api::indent))
}
