use std::sync::Arc;

use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use rand::Rng;

use crate::config::SecretManager;
use crate::errors::internal::{CredentialError, CryptoError};
use crate::errors::InternalError;

/// Password hashing with Argon2id, keyed with the server-side pepper
///
/// Hashing and verification run on the blocking pool.
pub struct CryptoProvider {
    secret_manager: Arc<SecretManager>,
}

impl CryptoProvider {
    pub fn new(secret_manager: Arc<SecretManager>) -> Self {
        Self { secret_manager }
    }

    fn argon2(pepper: &[u8]) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(pepper, Algorithm::Argon2id, Version::V0x13, Params::default())
            .map_err(|e| CredentialError::PasswordHashingFailed(format!("Failed to initialize Argon2: {}", e)).into())
    }

    pub async fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let password = password.to_string();
        let pepper = self.secret_manager.password_pepper().to_string();

        tokio::task::spawn_blocking(move || -> Result<String, InternalError> {
            let salt = SaltString::generate(&mut rand_core::OsRng);
            let hash = Self::argon2(pepper.as_bytes())?
                .hash_password(password.as_bytes(), &salt)
                .map_err(|e| CredentialError::PasswordHashingFailed(e.to_string()))?
                .to_string();
            Ok(hash)
        })
        .await
        .map_err(|e| CryptoError::other("hash_password", e.to_string()))?
    }

    /// False for a wrong password or an unparseable stored hash
    pub async fn verify_password(&self, password_hash: &str, password: &str) -> Result<bool, InternalError> {
        let password = password.to_string();
        let password_hash = password_hash.to_string();
        let pepper = self.secret_manager.password_pepper().to_string();

        tokio::task::spawn_blocking(move || -> Result<bool, InternalError> {
            let parsed_hash = match PasswordHash::new(&password_hash) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::error!("Stored password hash is malformed: {}", e);
                    return Ok(false);
                }
            };
            Ok(Self::argon2(pepper.as_bytes())?
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok())
        })
        .await
        .map_err(|e| CryptoError::other("verify_password", e.to_string()))?
    }

    /// 20 random characters from letters, digits and symbols
    pub fn generate_secure_password(&self) -> String {
        const PASSWORD_LENGTH: usize = 20;
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                                 abcdefghijklmnopqrstuvwxyz\
                                 0123456789\
                                 !@#$%^&*()_+-=[]{}|;:,.<>?";

        let mut rng = rand::rng();
        (0..PASSWORD_LENGTH)
            .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
            .collect()
    }
}
