use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Car {
    pub id: i64,
    /// Owning driver.
    pub user_id: i64,
    pub car_name: String,
    pub city: String,
    pub car_type: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload; the owner always comes from verified claims.
#[derive(Debug, Clone)]
pub struct NewCar {
    pub user_id: i64,
    pub car_name: String,
    pub city: String,
    pub car_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCarRequest {
    /// Accepted for wire compatibility, never trusted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub car_name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub car_type: String,
}

impl CreateCarRequest {
    pub fn validate(&self) -> Result<(), crate::error::AppError> {
        if self.car_name.trim().is_empty() {
            return Err(crate::error::AppError::validation("car name should not be empty"));
        }
        if self.car_type.trim().is_empty() {
            return Err(crate::error::AppError::validation("car type should not be empty"));
        }
        if self.city.trim().is_empty() {
            return Err(crate::error::AppError::validation("city should not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCarRequest {
    pub active: Option<bool>,
    pub car_name: Option<String>,
    pub city: Option<String>,
    pub car_type: Option<String>,
}

impl Car {
    /// Apply a partial update; absent fields keep their current value.
    pub fn apply(&mut self, update: &UpdateCarRequest) {
        if let Some(active) = update.active {
            self.active = active;
        }
        if let Some(name) = update.car_name.as_ref().filter(|s| !s.is_empty()) {
            self.car_name = name.clone();
        }
        if let Some(city) = update.city.as_ref().filter(|s| !s.is_empty()) {
            self.city = city.clone();
        }
        if let Some(car_type) = update.car_type.as_ref().filter(|s| !s.is_empty()) {
            self.car_type = car_type.clone();
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListCarsQuery {
    pub active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CarList {
    pub cars: Vec<Car>,
}
