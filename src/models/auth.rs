use serde::{Deserialize, Serialize};

use super::user::UserRole;

/// Claims embedded in the access token and returned by the check endpoint.
///
/// The wire names (`id`, `username`, `email`, `type`, `exp`) are a contract
/// shared with every service that calls `/check_token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(rename = "type")]
    pub role: UserRole,
    pub exp: i64,
}

impl Claims {
    pub fn is_driver(&self) -> bool {
        self.role == UserRole::Driver
    }
}
