use serde::{Deserialize, Serialize};

use crate::types::db::UserRole;

/// Session token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Session id, the primary key of the backing `sessions` row
    pub sid: String,

    /// Role at issue time. Informational only; authorization uses the stored role.
    pub role: String,

    pub iat: i64,

    pub exp: i64,
}

/// The authenticated user behind a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i32,
    pub username: String,
    pub role: UserRole,
    pub session_id: String,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
