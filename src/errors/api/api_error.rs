use crate::errors::internal::{
    AuthorizationError, CredentialError, DocumentError, InternalError, ReviewError, UserError,
    ValidationError,
};
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Standardized error response for resource endpoints
#[derive(Object, Debug)]
pub struct ApiErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Error types for document, review, user and dashboard endpoints
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Input failed validation; nothing was changed
    #[oai(status = 400)]
    BadRequest(Json<ApiErrorResponse>),

    /// Missing, invalid or expired session
    #[oai(status = 401)]
    Unauthorized(Json<ApiErrorResponse>),

    /// Authenticated but not allowed to perform the action
    #[oai(status = 403)]
    Forbidden(Json<ApiErrorResponse>),

    /// Entity does not exist
    #[oai(status = 404)]
    NotFound(Json<ApiErrorResponse>),

    /// Unique constraint would be violated
    #[oai(status = 409)]
    Conflict(Json<ApiErrorResponse>),

    /// Uploaded file exceeds the configured maximum
    #[oai(status = 413)]
    PayloadTooLarge(Json<ApiErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ApiErrorResponse>),
}

impl ApiError {
    fn build(error: &str, message: impl Into<String>, status_code: u16) -> Json<ApiErrorResponse> {
        Json(ApiErrorResponse {
            error: error.to_string(),
            message: message.into(),
            status_code,
        })
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(Self::build("validation_failed", message, 400))
    }

    pub fn unauthorized(error: &str, message: impl Into<String>) -> Self {
        ApiError::Unauthorized(Self::build(error, message, 401))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(Self::build("permission_denied", message, 403))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(Self::build("not_found", message, 404))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(Self::build("conflict", message, 409))
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        ApiError::PayloadTooLarge(Self::build("file_too_large", message, 413))
    }

    /// Convert InternalError to ApiError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Infrastructure details are logged but never exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Database(_)
            | InternalError::Storage(_)
            | InternalError::Crypto(_)
            | InternalError::Parse { .. } => {
                tracing::error!("Infrastructure error: {}", err);
                Self::internal_server_error()
            }

            InternalError::Validation(ValidationError::FileTooLarge { .. }) => {
                Self::payload_too_large(err.to_string())
            }
            InternalError::Validation(_) => Self::bad_request(err.to_string()),

            InternalError::Authorization(AuthorizationError::Unauthenticated) => {
                Self::unauthorized("unauthenticated", "Authentication required")
            }
            InternalError::Authorization(_) => {
                tracing::warn!("Authorization denied: {}", err);
                Self::forbidden(err.to_string())
            }

            InternalError::Credential(CredentialError::ExpiredToken) => {
                Self::unauthorized("expired_token", "Session has expired")
            }
            InternalError::Credential(CredentialError::SessionNotFound { .. }) => {
                Self::unauthorized("session_revoked", "Session is no longer valid, please log in again")
            }
            InternalError::Credential(CredentialError::AccountDisabled { .. }) => {
                Self::unauthorized("account_disabled", "This account has been disabled")
            }
            InternalError::Credential(CredentialError::PasswordHashingFailed(_)) => {
                tracing::error!("Password hashing failed: {}", err);
                Self::internal_server_error()
            }
            InternalError::Credential(_) => {
                Self::unauthorized("invalid_token", "Invalid or malformed session token")
            }

            InternalError::User(UserError::UserIdNotFound { .. })
            | InternalError::Document(DocumentError::NotFound { .. })
            | InternalError::Review(ReviewError::NotFound { .. }) => Self::not_found(err.to_string()),

            InternalError::User(UserError::DuplicateUsername { .. })
            | InternalError::User(UserError::DuplicateEmail { .. }) => Self::conflict(err.to_string()),
        }
    }

    /// Create a generic internal server error
    fn internal_server_error() -> Self {
        ApiError::InternalError(Self::build(
            "internal_error",
            "An internal error occurred",
            500,
        ))
    }

    fn body(&self) -> &ApiErrorResponse {
        match self {
            ApiError::BadRequest(json)
            | ApiError::Unauthorized(json)
            | ApiError::Forbidden(json)
            | ApiError::NotFound(json)
            | ApiError::Conflict(json)
            | ApiError::PayloadTooLarge(json)
            | ApiError::InternalError(json) => &json.0,
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.body().message.clone()
    }

    /// Get the error code from the error variant
    pub fn error_code(&self) -> &str {
        &self.body().error
    }

    /// Get the HTTP status code from the error variant
    pub fn status_code(&self) -> u16 {
        self.body().status_code
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<InternalError> for ApiError {
    fn from(err: InternalError) -> Self {
        ApiError::from_internal_error(err)
    }
}
