use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CarRequest {
    pub id: i64,
    /// Requester, stamped from verified claims.
    pub user_id: i64,
    pub user_name: String,
    pub car_type: String,
    pub car_id: Option<i64>,
    pub city: String,
    pub address: String,
    pub active: bool,
    /// 0 until rated.
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle position derived from `active` and `car_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CarRequestState {
    Open,
    Assigned,
    Closed,
}

impl std::fmt::Display for CarRequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CarRequestState::Open => "open",
            CarRequestState::Assigned => "assigned",
            CarRequestState::Closed => "closed",
        };
        write!(f, "{s}")
    }
}

impl CarRequest {
    pub fn state(&self) -> CarRequestState {
        match (self.active, self.car_id) {
            (false, _) => CarRequestState::Closed,
            (true, Some(_)) => CarRequestState::Assigned,
            (true, None) => CarRequestState::Open,
        }
    }

    /// Apply an update and check the result is a legal combination.
    ///
    /// Any subset of fields may change at once. A rating needs the resulting
    /// request to be assigned or closed, and must lie in `MIN_RATING..=MAX_RATING`.
    /// An existing car reference is never cleared.
    pub fn apply(&mut self, update: &UpdateCarRequestBody) -> Result<(), AppError> {
        update.validate()?;
        if let Some(active) = update.active {
            self.active = active;
        }
        if let Some(car_id) = update.car_id {
            self.car_id = Some(car_id);
        }
        if let Some(rating) = update.rating {
            if self.state() == CarRequestState::Open {
                return Err(AppError::validation(
                    "an open car request cannot be rated",
                ));
            }
            self.rating = rating;
        }
        Ok(())
    }
}

/// Insert payload; requester identity comes from verified claims only.
#[derive(Debug, Clone)]
pub struct NewCarRequest {
    pub user_id: i64,
    pub user_name: String,
    pub car_type: String,
    pub city: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCarRequestBody {
    #[serde(default)]
    pub car_type: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub address: String,
}

impl CreateCarRequestBody {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.car_type.trim().is_empty() {
            return Err(AppError::validation("car type should not be empty"));
        }
        if self.city.trim().is_empty() {
            return Err(AppError::validation("city should not be empty"));
        }
        if self.address.trim().is_empty() {
            return Err(AppError::validation("address should not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCarRequestBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
}

impl UpdateCarRequestBody {
    /// Checks that need no stored state: the rating bounds.
    pub fn validate(&self) -> Result<(), AppError> {
        match self.rating {
            Some(rating) if !(MIN_RATING..=MAX_RATING).contains(&rating) => Err(
                AppError::validation(format!(
                    "rating should be between {MIN_RATING} and {MAX_RATING}"
                )),
            ),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListCarRequestsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

/// Store-level filter; empty strings are normalized away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarRequestFilter {
    pub car_type: Option<String>,
    pub city: Option<String>,
    pub active: bool,
    pub user_id: Option<i64>,
}

impl From<&ListCarRequestsQuery> for CarRequestFilter {
    fn from(q: &ListCarRequestsQuery) -> Self {
        let non_empty = |s: &Option<String>| s.as_ref().filter(|v| !v.is_empty()).cloned();
        Self {
            car_type: non_empty(&q.car_type),
            city: non_empty(&q.city),
            active: q.active.unwrap_or(true),
            user_id: q.user_id,
        }
    }
}

impl CarRequestFilter {
    pub fn matches(&self, req: &CarRequest) -> bool {
        req.active == self.active
            && self.city.as_ref().map_or(true, |c| &req.city == c)
            && self.car_type.as_ref().map_or(true, |t| &req.car_type == t)
            && self.user_id.map_or(true, |id| req.user_id == id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CarRequestList {
    pub car_requests: Vec<CarRequest>,
}
