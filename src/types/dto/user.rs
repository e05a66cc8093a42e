use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Enum, Object};

use crate::types::db::{user, UserRole};

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
#[oai(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Reviewer,
}

impl From<UserRole> for Role {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => Role::Admin,
            UserRole::Reviewer => Role::Reviewer,
        }
    }
}

impl From<Role> for UserRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => UserRole::Admin,
            Role::Reviewer => UserRole::Reviewer,
        }
    }
}

/// Request to create an account
#[derive(Object, Debug)]
pub struct CreateUserRequest {
    /// 3-80 characters: letters, digits, `_`, `.`, `-`
    pub username: String,

    pub email: String,

    /// 8-128 characters, must not contain the username
    pub password: String,

    /// Defaults to `reviewer`
    pub role: Option<Role>,
}

/// Partial update. Omitted fields are left unchanged.
#[derive(Object, Debug, Default)]
pub struct UpdateUserRequest {
    pub email: Option<String>,

    pub password: Option<String>,

    /// Admin only, and never on the caller's own account
    pub role: Option<Role>,

    /// Admin only, and never on the caller's own account
    pub is_active: Option<bool>,
}

#[derive(Object, Debug, Clone)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            role: model.role.into(),
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
}

#[derive(ApiResponse)]
pub enum CreateUserApiResponse {
    /// Account created
    #[oai(status = 201)]
    Created(Json<UserResponse>),
}
