//! Action dispatch for the single-ingress gateway.
//!
//! A submission names an `action` and carries the matching payload. The
//! gateway never verifies tokens itself: it forwards the caller's bearer token
//! to the service that owns the action and reshapes that service's answer.

use std::str::FromStr;

use axum::http::{header, Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::verifier::TokenVerifier;
use crate::{
    error::AppError,
    models::{
        car::CreateCarRequest,
        car_request::{CreateCarRequestBody, ListCarRequestsQuery},
        envelope::{accepted, Accepted, Envelope},
        user::{AuthenticateRequest, RegisterRequest, UpdateUserRequest},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Auth,
    Register,
    EditUser,
    RequestCar,
    CreateCar,
    ListCarRequests,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Auth,
        Action::Register,
        Action::EditUser,
        Action::RequestCar,
        Action::CreateCar,
        Action::ListCarRequests,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Action::Auth => "auth",
            Action::Register => "register",
            Action::EditUser => "edit_user",
            Action::RequestCar => "request_car",
            Action::CreateCar => "create_car",
            Action::ListCarRequests => "list_car_requests",
        }
    }

    pub fn requires_token(self) -> bool {
        !matches!(self, Action::Auth | Action::Register)
    }
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| AppError::validation("unknown action"))
    }
}

/// The gateway's request envelope: one action tag plus its payload.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Submission {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthenticateRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub register: Option<RegisterRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_user: Option<UpdateUserRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_car_request: Option<CreateCarRequestBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_car: Option<CreateCarRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_car_requests: Option<ListCarRequestsQuery>,
}

fn payload<T>(value: Option<T>, name: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::validation(format!("missing {name} payload")))
}

/// HTTP client for the Identity Provider and the Resource Service.
///
/// Single attempt per call: no retry, backoff or deadline.
#[derive(Clone)]
pub struct Downstream {
    http: reqwest::Client,
    identity_url: String,
    resource_url: String,
}

impl Downstream {
    pub fn new(http: reqwest::Client, identity_url: &str, resource_url: &str) -> Self {
        Self {
            http,
            identity_url: identity_url.trim_end_matches('/').to_string(),
            resource_url: resource_url.trim_end_matches('/').to_string(),
        }
    }

    fn identity(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http.request(method, format!("{}{}", self.identity_url, path))
    }

    fn resource(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http.request(method, format!("{}{}", self.resource_url, path))
    }

    /// Send and translate: `202` yields the payload, any other status is
    /// relayed with the downstream message, transport and decode failures
    /// become a generic internal error.
    async fn relay(
        &self,
        request: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> Result<Option<Value>, AppError> {
        let request = match token {
            Some(token) => request.header(header::AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;
        let status = response.status();
        let body: Envelope = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("undecodable response ({status}): {e}")))?;

        if status != StatusCode::ACCEPTED {
            return Err(AppError::Relayed {
                status,
                message: body.message,
            });
        }
        Ok(body.data)
    }
}

pub struct GatewayService;

impl GatewayService {
    /// Route a submission to the handler registered for its action.
    pub async fn dispatch(
        downstream: &Downstream,
        verifier: &dyn TokenVerifier,
        submission: Submission,
        bearer: Option<String>,
    ) -> Result<Accepted<Option<Value>>, AppError> {
        let action: Action = submission.action.parse()?;
        let token = if action.requires_token() {
            Some(bearer.ok_or(AppError::InvalidToken)?)
        } else {
            None
        };
        let token = token.as_deref();

        match action {
            Action::Auth => {
                let body = payload(submission.auth, "auth")?;
                let data = downstream
                    .relay(downstream.identity(Method::POST, "/authenticate").json(&body), None)
                    .await?;
                Ok(accepted("Authenticated", data))
            }
            Action::Register => {
                let body = payload(submission.register, "register")?;
                body.validate()?;
                let data = downstream
                    .relay(downstream.identity(Method::POST, "/register").json(&body), None)
                    .await?;
                Ok(accepted("Registered", data))
            }
            Action::EditUser => {
                let body = payload(submission.update_user, "update_user")?;
                body.validate()?;
                let token = token.ok_or(AppError::InvalidToken)?;
                // the subject id comes from the identity provider, never from the payload
                let claims = verifier.check(token).await?;
                let path = format!("/users/{}", claims.id);
                let data = downstream
                    .relay(downstream.identity(Method::PUT, &path).json(&body), Some(token))
                    .await?;
                Ok(accepted("User updated successfully", data))
            }
            Action::RequestCar => {
                let body = payload(submission.create_car_request, "create_car_request")?;
                body.validate()?;
                let data = downstream
                    .relay(downstream.resource(Method::POST, "/car_requests").json(&body), token)
                    .await?;
                Ok(accepted("Car request created", data))
            }
            Action::CreateCar => {
                let body = payload(submission.create_car, "create_car")?;
                body.validate()?;
                let data = downstream
                    .relay(downstream.resource(Method::POST, "/cars").json(&body), token)
                    .await?;
                Ok(accepted("Car created successfully", data))
            }
            Action::ListCarRequests => {
                let query = submission.list_car_requests.unwrap_or_default();
                let data = downstream
                    .relay(downstream.resource(Method::GET, "/car_requests").query(&query), token)
                    .await?;
                Ok(accepted("Car requests retrieved", data))
            }
        }
    }
}
