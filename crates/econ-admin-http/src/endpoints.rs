//! Backend endpoint paths and wire types.

use serde::{Deserialize, Serialize};

use econ_admin_core::RoleSet;

/// POST, `{username, password}`
pub const LOGIN: &str = "/api/auth/login";

/// POST, no body
pub const LOGOUT: &str = "/api/auth/logout";

/// GET
pub const ME: &str = "/api/auth/me";

/// GET
pub const VALIDATE: &str = "/api/auth/validate";

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub refresh_token: String,
    pub username: String,
    pub roles: RoleSet,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Response from `/api/auth/me`. Extra fields such as `isAdmin` are ignored;
/// role flags are always derived from `roles`.
#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub username: String,
    pub roles: RoleSet,
}

#[derive(Debug, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
}

/// Error body format.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: Option<String>,
    pub message: Option<String>,
}
