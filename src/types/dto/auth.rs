use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::dto::user::UserResponse;

/// Request model for user login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,

    pub password: String,
}

/// Successful login
#[derive(Object, Debug)]
pub struct LoginResponse {
    /// Session token, sent back as `Authorization: Bearer <token>`
    pub session_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Seconds until the session expires
    pub expires_in: i64,

    pub user: UserResponse,
}

/// The account behind the current session
#[derive(Object, Debug)]
pub struct WhoAmIResponse {
    pub user: UserResponse,

    /// Session expiration time (Unix timestamp)
    pub session_expires_at: i64,
}

#[derive(Object, Debug)]
pub struct LogoutResponse {
    pub message: String,
}
