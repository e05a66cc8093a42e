use thiserror::Error;

/// Authentication and session failures
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is disabled: {username}")]
    AccountDisabled { username: String },

    #[error("Invalid token: {reason}")]
    InvalidToken { reason: String },

    #[error("Expired token")]
    ExpiredToken,

    #[error("Session not found or revoked: {session_id}")]
    SessionNotFound { session_id: String },

    #[error("Password hashing failed: {0}")]
    PasswordHashingFailed(String),
}

impl CredentialError {
    pub fn invalid_token(reason: impl Into<String>) -> Self {
        Self::InvalidToken {
            reason: reason.into(),
        }
    }
}
