use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::config::SecretManager;
use crate::errors::internal::{CredentialError, CryptoError};
use crate::errors::InternalError;
use crate::types::db::{session, user};
use crate::types::internal::auth::Claims;

/// Signs and verifies session tokens (HS256)
///
/// A token only proves which session it was issued for; the session row
/// and the user are checked separately on every request.
pub struct TokenProvider {
    secret_manager: Arc<SecretManager>,
}

impl TokenProvider {
    pub fn new(secret_manager: Arc<SecretManager>) -> Self {
        Self { secret_manager }
    }

    pub fn issue_session_token(&self, user: &user::Model, session: &session::Model) -> Result<String, InternalError> {
        let claims = Claims {
            sub: user.id.to_string(),
            sid: session.id.clone(),
            role: user.role.as_str().to_string(),
            iat: session.created_at,
            exp: session.expires_at,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_manager.session_secret().as_bytes()),
        )
        .map_err(|e| CryptoError::EncodeToken { message: e.to_string() }.into())
    }

    /// Verify signature and expiry and return the claims
    pub fn validate_session_token(&self, token: &str) -> Result<Claims, InternalError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_manager.session_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => CredentialError::ExpiredToken.into(),
            _ => {
                tracing::debug!("Session token rejected: {}", e);
                CredentialError::invalid_token("invalid signature or malformed token").into()
            }
        })
    }

    /// User id from the `sub` claim
    pub fn user_id(claims: &Claims) -> Result<i32, InternalError> {
        claims
            .sub
            .parse::<i32>()
            .map_err(|_| CredentialError::invalid_token("subject is not a user id").into())
    }
}
