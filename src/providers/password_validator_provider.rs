use crate::errors::internal::ValidationError;
use crate::errors::InternalError;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PasswordValidationError {
    #[error("Password must be at least {0} characters")]
    TooShort(usize),

    #[error("Password must not exceed {0} characters")]
    TooLong(usize),

    #[error("Password must not contain the username")]
    ContainsUsername,
}

impl From<PasswordValidationError> for InternalError {
    fn from(err: PasswordValidationError) -> Self {
        ValidationError::PasswordPolicy(err.to_string()).into()
    }
}

/// Password policy: 8-128 characters, username not contained (case-insensitive)
pub struct PasswordValidatorProvider {
    min_length: usize,
    max_length: usize,
}

impl PasswordValidatorProvider {
    pub fn new() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
        }
    }

    /// Checks in order and stops at the first failure
    pub fn validate(&self, password: &str, username: Option<&str>) -> Result<(), PasswordValidationError> {
        let length = password.chars().count();
        if length < self.min_length {
            return Err(PasswordValidationError::TooShort(self.min_length));
        }
        if length > self.max_length {
            return Err(PasswordValidationError::TooLong(self.max_length));
        }

        if let Some(username) = username.filter(|u| !u.is_empty()) {
            if password.to_lowercase().contains(&username.to_lowercase()) {
                return Err(PasswordValidationError::ContainsUsername);
            }
        }

        Ok(())
    }
}

impl Default for PasswordValidatorProvider {
    fn default() -> Self {
        Self::new()
    }
}
