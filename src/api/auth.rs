use std::sync::Arc;

use poem::Request;
use poem_openapi::{auth::Bearer, payload::Json, OpenApi, SecurityScheme, Tags};

use crate::api::helpers;
use crate::coordinators::AuthCoordinator;
use crate::errors::internal::ValidationError;
use crate::errors::AuthError;
use crate::types::dto::{LoginRequest, LoginResponse, LogoutResponse, WhoAmIResponse};
use crate::types::internal::context::RequestContext;

/// Session token issued by `/auth/login`
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct SessionAuth(pub Bearer);

/// Authentication API endpoints
pub struct AuthApi {
    auth_coordinator: Arc<AuthCoordinator>,
}

impl AuthApi {
    pub fn new(auth_coordinator: Arc<AuthCoordinator>) -> Self {
        Self { auth_coordinator }
    }

    async fn context(&self, req: &Request, auth: &SessionAuth) -> Result<RequestContext, AuthError> {
        helpers::authenticate(req, auth, &self.auth_coordinator)
            .await
            .map_err(AuthError::from_internal_error)
    }
}

#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Authenticate with username and password
    ///
    /// Returns a session token for subsequent requests. The session lasts
    /// `SESSION_TTL_HOURS` unless the user logs out or is disabled.
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, req: &Request, body: Json<LoginRequest>) -> Result<Json<LoginResponse>, AuthError> {
        let username = body.username.trim();
        if username.is_empty() {
            return Err(AuthError::from_internal_error(
                ValidationError::MissingField { field: "username" }.into(),
            ));
        }
        if body.password.is_empty() {
            return Err(AuthError::from_internal_error(
                ValidationError::MissingField { field: "password" }.into(),
            ));
        }

        let ctx = RequestContext::from_request(req);
        let (issued, user) = self
            .auth_coordinator
            .login(&ctx, username, &body.password)
            .await
            .map_err(AuthError::from_internal_error)?;

        let expires_in = (issued.session.expires_at - issued.session.created_at).max(0);
        Ok(Json(LoginResponse {
            session_token: issued.token,
            token_type: "Bearer".to_string(),
            expires_in,
            user: user.into(),
        }))
    }

    /// End the current session
    #[oai(path = "/logout", method = "post", tag = "AuthTags::Authentication")]
    async fn logout(&self, req: &Request, auth: SessionAuth) -> Result<Json<LogoutResponse>, AuthError> {
        let ctx = self.context(req, &auth).await?;
        self.auth_coordinator
            .logout(&ctx)
            .await
            .map_err(AuthError::from_internal_error)?;

        Ok(Json(LogoutResponse {
            message: "Logged out successfully".to_string(),
        }))
    }

    /// The account behind the current session
    #[oai(path = "/whoami", method = "get", tag = "AuthTags::Authentication")]
    async fn whoami(&self, req: &Request, auth: SessionAuth) -> Result<Json<WhoAmIResponse>, AuthError> {
        let ctx = self.context(req, &auth).await?;
        let (user, session_expires_at) = self
            .auth_coordinator
            .whoami(&ctx)
            .await
            .map_err(AuthError::from_internal_error)?;

        Ok(Json(WhoAmIResponse {
            user: user.into(),
            session_expires_at,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{insert_user_with_password, setup_test_app};
    use crate::types::db::UserRole;
    use crate::types::dto::Role;
    use tempfile::TempDir;

    async fn setup(dir: &TempDir) -> (AuthApi, Arc<crate::app_data::AppData>) {
        let app = setup_test_app(dir.path()).await;
        insert_user_with_password(&app.db, "alice", "correct-horse-9", UserRole::Reviewer).await;
        (AuthApi::new(Arc::new(AuthCoordinator::new(app.clone()))), app)
    }

    fn login_body(username: &str, password: &str) -> Json<LoginRequest> {
        Json(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    fn bearer(token: &str) -> SessionAuth {
        SessionAuth(Bearer {
            token: token.to_string(),
        })
    }

    #[tokio::test]
    async fn test_login_then_whoami() {
        let dir = TempDir::new().unwrap();
        let (api, _app) = setup(&dir).await;
        let req = Request::builder().finish();

        let login = api.login(&req, login_body("alice", "correct-horse-9")).await.unwrap();
        assert_eq!(login.token_type, "Bearer");
        assert_eq!(login.expires_in, 24 * 3600);
        assert_eq!(login.user.role, Role::Reviewer);

        let me = api.whoami(&req, bearer(&login.session_token)).await.unwrap();
        assert_eq!(me.user.username, "alice");
        assert!(me.session_expires_at > chrono::Utc::now().timestamp());
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let dir = TempDir::new().unwrap();
        let (api, _app) = setup(&dir).await;
        let req = Request::builder().finish();

        let err = api.login(&req, login_body("alice", "wrong-password")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials(_)));
        assert_eq!(err.status_code(), 401);

        let err = api.login(&req, login_body("nobody", "correct-horse-9")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials(_)));
    }

    #[tokio::test]
    async fn test_login_with_blank_username() {
        let dir = TempDir::new().unwrap();
        let (api, _app) = setup(&dir).await;
        let req = Request::builder().finish();

        let err = api.login(&req, login_body("  ", "x")).await.unwrap_err();
        assert!(matches!(err, AuthError::ValidationFailed(_)));
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_logout_revokes_session() {
        let dir = TempDir::new().unwrap();
        let (api, _app) = setup(&dir).await;
        let req = Request::builder().finish();

        let login = api.login(&req, login_body("alice", "correct-horse-9")).await.unwrap();
        api.logout(&req, bearer(&login.session_token)).await.unwrap();

        let err = api.whoami(&req, bearer(&login.session_token)).await.unwrap_err();
        assert!(matches!(err, AuthError::SessionRevoked(_)));
    }

    #[tokio::test]
    async fn test_whoami_with_garbage_token() {
        let dir = TempDir::new().unwrap();
        let (api, _app) = setup(&dir).await;
        let req = Request::builder().finish();

        let err = api.whoami(&req, bearer("not-a-jwt")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }
}
