use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uniform response body returned by every endpoint of every service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    pub error: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            error: false,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            data: None,
        }
    }
}

/// Successful handler output: services answer `202 Accepted` with an envelope.
pub type Accepted<T> = (StatusCode, Json<Envelope<T>>);

pub fn accepted<T>(message: impl Into<String>, data: T) -> Accepted<T> {
    (StatusCode::ACCEPTED, Json(Envelope::success(message, data)))
}
