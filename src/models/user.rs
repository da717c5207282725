use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Driver,
    #[default]
    Customer,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UserRole::Driver => "driver",
            UserRole::Customer => "customer",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl std::str::FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "driver" => Ok(UserRole::Driver),
            "customer" => Ok(UserRole::Customer),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

impl TryFrom<String> for UserRole {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// DB row struct. The role is stored as TEXT and parsed on the way out.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    #[sqlx(try_from = "String")]
    #[serde(rename = "type")]
    pub role: UserRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Display name carried in tokens: first and last name concatenated.
    pub fn username(&self) -> String {
        format!("{}{}", self.first_name, self.last_name)
    }
}

/// Insert payload; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub role: UserRole,
}

// Request/Response DTOs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticateRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    #[serde(default)]
    pub city: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), crate::error::AppError> {
        use crate::error::AppError;

        if self.email.trim().is_empty() {
            return Err(AppError::validation("email should not be empty"));
        }
        if self.password_confirmation != self.password {
            return Err(AppError::validation(
                "password and password confirmation do not match",
            ));
        }
        if self.first_name.is_empty() || self.last_name.is_empty() {
            return Err(AppError::validation(
                "first name and last name should not be empty",
            ));
        }
        // counted in bytes, so six bytes of multi-byte characters pass
        if self.password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(format!(
                "password should be at least {MIN_PASSWORD_LEN} characters long"
            )));
        }
        Ok(())
    }
}

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl UpdateUserRequest {
    /// Fields that are present must not be blank.
    pub fn validate(&self) -> Result<(), crate::error::AppError> {
        use crate::error::AppError;

        for (field, value) in [("first name", &self.first_name), ("last name", &self.last_name)] {
            if value.as_deref().is_some_and(str::is_empty) {
                return Err(AppError::validation(format!("{field} should not be empty")));
            }
        }
        if self.email.as_deref().is_some_and(|e| e.trim().is_empty()) {
            return Err(AppError::validation("email should not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthenticateResponse {
    pub user: User,
    pub token: String,
}
