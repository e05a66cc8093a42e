use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::payload::Json;
use poem_openapi::{OpenApi, Tags};

use crate::api::auth::SessionAuth;
use crate::api::helpers;
use crate::coordinators::{AuthCoordinator, CreateUserInput, UpdateUserInput, UserCoordinator};
use crate::errors::ApiError;
use crate::types::db::UserRole;
use crate::types::dto::{CreateUserApiResponse, CreateUserRequest, UpdateUserRequest, UserListResponse, UserResponse};

/// Account management
pub struct UserApi {
    auth_coordinator: Arc<AuthCoordinator>,
    user_coordinator: Arc<UserCoordinator>,
}

impl UserApi {
    pub fn new(auth_coordinator: Arc<AuthCoordinator>, user_coordinator: Arc<UserCoordinator>) -> Self {
        Self {
            auth_coordinator,
            user_coordinator,
        }
    }
}

#[derive(Tags)]
enum UserTags {
    /// Account management
    Users,
}

#[OpenApi]
impl UserApi {
    /// List all users, newest first
    #[oai(path = "/users", method = "get", tag = "UserTags::Users")]
    async fn list(&self, req: &Request, auth: SessionAuth) -> Result<Json<UserListResponse>, ApiError> {
        let ctx = helpers::authenticate(req, &auth, &self.auth_coordinator).await?;
        let users = self.user_coordinator.list_users(&ctx).await?;
        Ok(Json(UserListResponse {
            users: users.into_iter().map(UserResponse::from).collect(),
        }))
    }

    /// Create an account
    ///
    /// Admins may create either role; reviewers may only create reviewers.
    #[oai(path = "/users", method = "post", tag = "UserTags::Users")]
    async fn create(
        &self,
        req: &Request,
        auth: SessionAuth,
        body: Json<CreateUserRequest>,
    ) -> Result<CreateUserApiResponse, ApiError> {
        let ctx = helpers::authenticate(req, &auth, &self.auth_coordinator).await?;
        let body = body.0;
        let created = self
            .user_coordinator
            .create_user(
                &ctx,
                CreateUserInput {
                    username: body.username,
                    email: body.email,
                    password: body.password,
                    role: body.role.map(UserRole::from).unwrap_or(UserRole::Reviewer),
                },
            )
            .await?;
        Ok(CreateUserApiResponse::Created(Json(created.into())))
    }

    #[oai(path = "/users/:id", method = "get", tag = "UserTags::Users")]
    async fn get(&self, req: &Request, auth: SessionAuth, id: Path<i32>) -> Result<Json<UserResponse>, ApiError> {
        let ctx = helpers::authenticate(req, &auth, &self.auth_coordinator).await?;
        let user = self.user_coordinator.get_user(&ctx, id.0).await?;
        Ok(Json(user.into()))
    }

    /// Edit an account
    ///
    /// Users may change their own email and password. Role and active flag
    /// are admin only and cannot be changed on the caller's own account.
    #[oai(path = "/users/:id", method = "patch", tag = "UserTags::Users")]
    async fn update(
        &self,
        req: &Request,
        auth: SessionAuth,
        id: Path<i32>,
        body: Json<UpdateUserRequest>,
    ) -> Result<Json<UserResponse>, ApiError> {
        let ctx = helpers::authenticate(req, &auth, &self.auth_coordinator).await?;
        let body = body.0;
        let updated = self
            .user_coordinator
            .update_user(
                &ctx,
                id.0,
                UpdateUserInput {
                    email: body.email,
                    password: body.password,
                    role: body.role.map(UserRole::from),
                    is_active: body.is_active,
                },
            )
            .await?;
        Ok(Json(updated.into()))
    }

    /// Disable an account and end its sessions (admin only, not on self)
    #[oai(path = "/users/:id/disable", method = "post", tag = "UserTags::Users")]
    async fn disable(&self, req: &Request, auth: SessionAuth, id: Path<i32>) -> Result<Json<UserResponse>, ApiError> {
        let ctx = helpers::authenticate(req, &auth, &self.auth_coordinator).await?;
        let disabled = self.user_coordinator.disable_user(&ctx, id.0).await?;
        Ok(Json(disabled.into()))
    }
}
