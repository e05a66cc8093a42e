use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::config::{EnvironmentProvider, SecretConfig, SecretType, SystemEnvironment};

pub const SESSION_SECRET_MIN_LENGTH: usize = 32;
pub const PASSWORD_PEPPER_MIN_LENGTH: usize = 16;

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Required secret '{secret_name}' is missing")]
    Missing { secret_name: String },

    #[error("Secret '{secret_name}' must be at least {expected} characters, got {actual}")]
    InvalidLength {
        secret_name: String,
        expected: usize,
        actual: usize,
    },
}

/// Holds the session signing secret, the password pepper and the optional
/// bootstrap admin password
pub struct SecretManager {
    session_secret: String,
    password_pepper: String,
    bootstrap_admin_password: Option<String>,
}

impl SecretManager {
    pub fn init() -> Result<Self, SecretError> {
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    pub fn from_env_provider(
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    ) -> Result<Self, SecretError> {
        let session_secret = Self::load_secret(env_provider.as_ref(), &Self::session_secret_config())?;
        let password_pepper = Self::load_secret(env_provider.as_ref(), &Self::pepper_config())?;
        let bootstrap_admin_password =
            Self::load_secret(env_provider.as_ref(), &Self::bootstrap_password_config())?;

        Ok(Self {
            session_secret,
            password_pepper,
            bootstrap_admin_password: Some(bootstrap_admin_password).filter(|p| !p.is_empty()),
        })
    }

    /// Build a manager from known values, used by tools and tests that do not read the environment
    pub fn from_values(
        session_secret: &str,
        password_pepper: &str,
        bootstrap_admin_password: Option<&str>,
    ) -> Result<Self, SecretError> {
        Self::check_length(&Self::session_secret_config(), session_secret)?;
        Self::check_length(&Self::pepper_config(), password_pepper)?;

        Ok(Self {
            session_secret: session_secret.to_string(),
            password_pepper: password_pepper.to_string(),
            bootstrap_admin_password: bootstrap_admin_password.map(str::to_string),
        })
    }

    fn session_secret_config() -> SecretConfig {
        SecretConfig::env("SESSION_SECRET")
            .required(true)
            .min_length(SESSION_SECRET_MIN_LENGTH)
    }

    fn pepper_config() -> SecretConfig {
        SecretConfig::env("PASSWORD_PEPPER")
            .required(true)
            .min_length(PASSWORD_PEPPER_MIN_LENGTH)
    }

    fn bootstrap_password_config() -> SecretConfig {
        SecretConfig::env("BOOTSTRAP_ADMIN_PASSWORD").required(false)
    }

    pub fn session_secret(&self) -> &str {
        &self.session_secret
    }

    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    pub fn bootstrap_admin_password(&self) -> Option<&str> {
        self.bootstrap_admin_password.as_deref()
    }

    pub(crate) fn load_secret(
        env_provider: &(dyn EnvironmentProvider + Send + Sync),
        config: &SecretConfig,
    ) -> Result<String, SecretError> {
        let value = match &config.secret_type {
            SecretType::EnvVar { name } => match env_provider.get_var(name) {
                Some(v) => v,
                None if !config.required => return Ok(String::new()),
                None => {
                    return Err(SecretError::Missing {
                        secret_name: name.clone(),
                    })
                }
            },
        };

        Self::check_length(config, &value)?;
        Ok(value)
    }

    fn check_length(config: &SecretConfig, value: &str) -> Result<(), SecretError> {
        if let Some(min_len) = config.min_length {
            if value.len() < min_len {
                return Err(SecretError::InvalidLength {
                    secret_name: config.secret_type.name().to_string(),
                    expected: min_len,
                    actual: value.len(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("session_secret", &"<redacted>")
            .field("password_pepper", &"<redacted>")
            .field(
                "bootstrap_admin_password",
                &self.bootstrap_admin_password.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
