use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};

use crate::{
    error::AppError,
    middleware::auth::BearerToken,
    models::{
        auth::Claims,
        envelope::{accepted, Accepted},
        user::{AuthenticateRequest, AuthenticateResponse, RegisterRequest, UpdateUserRequest, User},
    },
    services::{auth::AuthService, metrics::TOKEN_CHECKS_COUNTER},
    state::IdentityState,
};

pub async fn authenticate(
    State(state): State<IdentityState>,
    payload: Result<Json<AuthenticateRequest>, JsonRejection>,
) -> Result<Accepted<AuthenticateResponse>, AppError> {
    let Json(body) = payload?;
    let res = AuthService::authenticate(state.store.as_ref(), &state.keys, &body.email, &body.password)
        .await?;
    let message = format!("Logged in user {}", res.user.email);
    Ok(accepted(message, res))
}

pub async fn register(
    State(state): State<IdentityState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Accepted<User>, AppError> {
    let Json(body) = payload?;
    AuthService::register(state.store.as_ref(), &body, state.bcrypt_cost)
        .await
        .map(|user| accepted("User registered successfully", user))
}

/// The authorization oracle: full signature and expiry check, then the claims.
pub async fn check_token(
    State(state): State<IdentityState>,
    BearerToken(token): BearerToken,
) -> Result<Accepted<Claims>, AppError> {
    match state.keys.verify(&token) {
        Ok(claims) => {
            TOKEN_CHECKS_COUNTER.with_label_values(&["accepted"]).inc();
            Ok(accepted("valid token", claims))
        }
        Err(e) => {
            TOKEN_CHECKS_COUNTER.with_label_values(&["rejected"]).inc();
            Err(e)
        }
    }
}

pub async fn update_user(
    State(state): State<IdentityState>,
    BearerToken(token): BearerToken,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Accepted<User>, AppError> {
    let Path(id) = id?;
    let Json(body) = payload?;
    body.validate()?;
    let caller = state.keys.verify(&token)?;
    AuthService::update_user(state.store.as_ref(), &caller, id, &body)
        .await
        .map(|user| accepted("User updated successfully", user))
}
