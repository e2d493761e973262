//! Authentication transfer objects

use serde::{Deserialize, Serialize};

/// Login request body. Fields are optional so a missing field reaches the
/// service as absent and maps to a 400 rather than a decode rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Login response: the bearer token plus plaintext-safe user info
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub admin: bool,
    pub employee_id: i32,
}
