use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::state::{IdentityState, ResourceState};

/// GET /ping: liveness only, touches nothing.
pub async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn identity_health(State(state): State<IdentityState>) -> (StatusCode, Json<Value>) {
    report(state.store.ping().await)
}

pub async fn resource_health(State(state): State<ResourceState>) -> (StatusCode, Json<Value>) {
    report(state.store.ping().await)
}

fn report(result: crate::db::StoreResult<()>) -> (StatusCode, Json<Value>) {
    match result {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "db": "connected" })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "error", "db": e.to_string() })),
        ),
    }
}
