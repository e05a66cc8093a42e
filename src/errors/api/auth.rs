use crate::errors::internal::{CredentialError, InternalError, ValidationError};
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Standardized error response for authentication endpoints
#[derive(Object, Debug)]
pub struct AuthErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Authentication error types
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Invalid username or password
    #[oai(status = 401)]
    InvalidCredentials(Json<AuthErrorResponse>),

    /// Account exists but has been disabled
    #[oai(status = 401)]
    AccountDisabled(Json<AuthErrorResponse>),

    /// Invalid or malformed session token
    #[oai(status = 401)]
    InvalidToken(Json<AuthErrorResponse>),

    /// Session token has expired
    #[oai(status = 401)]
    ExpiredToken(Json<AuthErrorResponse>),

    /// Session was logged out or revoked
    #[oai(status = 401)]
    SessionRevoked(Json<AuthErrorResponse>),

    /// Request body failed validation
    #[oai(status = 400)]
    ValidationFailed(Json<AuthErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<AuthErrorResponse>),
}

impl AuthError {
    fn build(error: &str, message: impl Into<String>, status_code: u16) -> Json<AuthErrorResponse> {
        Json(AuthErrorResponse {
            error: error.to_string(),
            message: message.into(),
            status_code,
        })
    }

    /// Create an InvalidCredentials error
    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(Self::build(
            "invalid_credentials",
            "Invalid username or password",
            401,
        ))
    }

    /// Create an AccountDisabled error
    pub fn account_disabled() -> Self {
        AuthError::AccountDisabled(Self::build(
            "account_disabled",
            "This account has been disabled",
            401,
        ))
    }

    /// Create an InvalidToken error
    pub fn invalid_token() -> Self {
        AuthError::InvalidToken(Self::build(
            "invalid_token",
            "Invalid or malformed session token",
            401,
        ))
    }

    /// Create an ExpiredToken error
    pub fn expired_token() -> Self {
        AuthError::ExpiredToken(Self::build("expired_token", "Session has expired", 401))
    }

    /// Create a SessionRevoked error
    pub fn session_revoked() -> Self {
        AuthError::SessionRevoked(Self::build(
            "session_revoked",
            "Session is no longer valid, please log in again",
            401,
        ))
    }

    /// Create a ValidationFailed error
    pub fn validation_failed(message: String) -> Self {
        AuthError::ValidationFailed(Self::build("validation_failed", message, 400))
    }

    /// Convert InternalError to AuthError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Credential(CredentialError::InvalidCredentials) => {
                tracing::debug!("Invalid credentials attempt");
                Self::invalid_credentials()
            }
            InternalError::Credential(CredentialError::AccountDisabled { username }) => {
                tracing::warn!("Login attempt for disabled account {}", username);
                Self::account_disabled()
            }
            InternalError::Credential(CredentialError::InvalidToken { reason }) => {
                tracing::debug!("Invalid session token: {}", reason);
                Self::invalid_token()
            }
            InternalError::Credential(CredentialError::ExpiredToken) => Self::expired_token(),
            InternalError::Credential(CredentialError::SessionNotFound { .. }) => {
                Self::session_revoked()
            }
            InternalError::Validation(ValidationError::MissingField { .. }) => {
                Self::validation_failed(err.to_string())
            }
            _ => {
                tracing::error!("Unexpected error in auth operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    /// Create a generic internal server error
    ///
    /// Always returns a generic message without exposing internal details.
    fn internal_server_error() -> Self {
        AuthError::InternalError(Self::build(
            "internal_error",
            "An internal error occurred",
            500,
        ))
    }

    fn body(&self) -> &AuthErrorResponse {
        match self {
            AuthError::InvalidCredentials(json)
            | AuthError::AccountDisabled(json)
            | AuthError::InvalidToken(json)
            | AuthError::ExpiredToken(json)
            | AuthError::SessionRevoked(json)
            | AuthError::ValidationFailed(json)
            | AuthError::InternalError(json) => &json.0,
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.body().message.clone()
    }

    /// Get the HTTP status code from the error variant
    pub fn status_code(&self) -> u16 {
        self.body().status_code
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
