#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::Value;
use tower::ServiceExt;

use ridehail::{
    db::MemoryStore,
    error::AppError,
    models::{auth::Claims, user::UserRole},
    routes,
    services::{token::TokenKeys, verifier::TokenVerifier},
    state::{IdentityState, ResourceState},
};

pub const SECRET: &str = "test-secret";
/// Lowest cost bcrypt accepts, keeps the suite fast.
pub const BCRYPT_COST: u32 = 4;

pub fn keys() -> Arc<TokenKeys> {
    Arc::new(TokenKeys::new(SECRET, 24))
}

/// Verifies tokens in-process with the given keys instead of calling the
/// Identity Provider.
pub struct LocalVerifier(pub TokenKeys);

#[async_trait]
impl TokenVerifier for LocalVerifier {
    async fn check(&self, token: &str) -> Result<Claims, AppError> {
        self.0.verify(token)
    }
}

pub fn local_verifier(secret: &str) -> Arc<LocalVerifier> {
    Arc::new(LocalVerifier(TokenKeys::new(secret, 24)))
}

pub fn identity_app() -> Router {
    routes::identity_router(IdentityState {
        store: Arc::new(MemoryStore::new()),
        keys: keys(),
        bcrypt_cost: BCRYPT_COST,
    })
}

/// Resource router verifying tokens locally with the shared test secret.
pub fn resource_app() -> Router {
    routes::resource_router(ResourceState {
        store: Arc::new(MemoryStore::new()),
        verifier: local_verifier(SECRET),
    })
}

pub fn claims(id: i64, role: UserRole) -> Claims {
    Claims {
        id,
        username: format!("User{id}"),
        email: format!("user{id}@example.com"),
        role,
        exp: (Utc::now() + Duration::hours(1)).timestamp(),
    }
}

pub fn token_for(id: i64, role: UserRole) -> String {
    keys().sign(&claims(id, role)).unwrap()
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, json)
}
