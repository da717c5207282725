use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::Value;

use crate::{
    error::AppError,
    middleware::auth::bearer_token,
    models::envelope::{Accepted, Envelope},
    services::{
        gateway::{Action, GatewayService, Submission},
        metrics::GATEWAY_ACTIONS_COUNTER,
    },
    state::GatewayState,
};

pub async fn broker() -> (StatusCode, Json<Envelope<()>>) {
    (StatusCode::OK, Json(Envelope::success("Hit the broker", ())))
}

/// POST /: the single ingress for every action.
pub async fn handle_submission(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    payload: Result<Json<Submission>, JsonRejection>,
) -> Result<Accepted<Option<Value>>, AppError> {
    let Json(submission) = payload?;
    let action = submission.action.clone();
    let bearer = bearer_token(&headers);

    let result =
        GatewayService::dispatch(&state.downstream, state.verifier.as_ref(), submission, bearer)
            .await;

    let outcome = if result.is_ok() { "ok" } else { "error" };
    let label = action.parse::<Action>().map(Action::name).unwrap_or("unknown");
    GATEWAY_ACTIONS_COUNTER
        .with_label_values(&[label, outcome])
        .inc();
    result
}
