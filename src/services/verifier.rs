//! The authorization oracle seen from outside the Identity Provider.
//!
//! Gateway and Resource Service only ever learn who a caller is through
//! [`TokenVerifier::check`]. In production that is a live `POST /check_token`
//! call; the claims are decoded into [`Claims`] exactly once, here.

use async_trait::async_trait;
use axum::http::{header, StatusCode};

use super::metrics::TOKEN_CHECKS_COUNTER;
use crate::{
    error::AppError,
    models::{auth::Claims, envelope::Envelope},
};

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Resolve a bearer token to verified claims. Fails closed.
    async fn check(&self, token: &str) -> Result<Claims, AppError>;
}

/// Delegates verification to the Identity Provider over HTTP.
///
/// No deadline is set on this hop: a stalled Identity Provider stalls the caller.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    check_url: String,
}

impl IdentityClient {
    pub fn new(http: reqwest::Client, identity_url: &str) -> Self {
        Self {
            http,
            check_url: format!("{}/check_token", identity_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl TokenVerifier for IdentityClient {
    async fn check(&self, token: &str) -> Result<Claims, AppError> {
        let response = self
            .http
            .post(&self.check_url)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("check_token: {e}")))?;

        if response.status() != StatusCode::ACCEPTED {
            TOKEN_CHECKS_COUNTER.with_label_values(&["rejected"]).inc();
            tracing::warn!("Identity provider rejected token with status {}", response.status());
            return Err(AppError::InvalidToken);
        }

        let body: Envelope<Claims> = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("check_token response: {e}")))?;
        let claims = body
            .data
            .ok_or_else(|| AppError::Upstream("check_token response carried no claims".into()))?;

        TOKEN_CHECKS_COUNTER.with_label_values(&["accepted"]).inc();
        Ok(claims)
    }
}
