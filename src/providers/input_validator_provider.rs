use crate::errors::internal::ValidationError;
use crate::errors::InternalError;

pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 80;
pub const EMAIL_MAX_LENGTH: usize = 120;
pub const TITLE_MAX_LENGTH: usize = 200;
pub const SCORE_MIN: i64 = 0;
pub const SCORE_MAX: i64 = 100;

/// Field-level checks for user, document and review input
pub struct InputValidatorProvider;

impl InputValidatorProvider {
    pub fn new() -> Self {
        Self
    }

    /// 3-80 characters from `[A-Za-z0-9_.-]`. Returns the trimmed username.
    pub fn username(&self, username: &str) -> Result<String, InternalError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ValidationError::MissingField { field: "username" }.into());
        }
        let length = username.chars().count();
        if length < USERNAME_MIN_LENGTH {
            return Err(ValidationError::InvalidField {
                field: "username",
                reason: format!("must be at least {} characters", USERNAME_MIN_LENGTH),
            }
            .into());
        }
        if length > USERNAME_MAX_LENGTH {
            return Err(ValidationError::TooLong {
                field: "username",
                max: USERNAME_MAX_LENGTH,
            }
            .into());
        }
        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        {
            return Err(ValidationError::InvalidField {
                field: "username",
                reason: "may only contain letters, digits, '_', '.' and '-'".to_string(),
            }
            .into());
        }
        Ok(username.to_string())
    }

    /// Requires a local part and a dotted domain. Returns the trimmed, lowercased address.
    pub fn email(&self, email: &str) -> Result<String, InternalError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingField { field: "email" }.into());
        }
        if email.chars().count() > EMAIL_MAX_LENGTH {
            return Err(ValidationError::TooLong {
                field: "email",
                max: EMAIL_MAX_LENGTH,
            }
            .into());
        }

        let invalid = || -> InternalError {
            ValidationError::InvalidField {
                field: "email",
                reason: "must look like name@example.com".to_string(),
            }
            .into()
        };

        let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
        let domain_ok = !domain.contains('@')
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !domain.contains("..");
        if local.is_empty() || !domain_ok || email.contains(char::is_whitespace) {
            return Err(invalid());
        }
        Ok(email.to_lowercase())
    }

    /// Required after trimming, at most 200 characters
    pub fn title(&self, title: Option<&str>) -> Result<String, InternalError> {
        let title = title.map(str::trim).unwrap_or_default();
        if title.is_empty() {
            return Err(ValidationError::MissingField { field: "title" }.into());
        }
        if title.chars().count() > TITLE_MAX_LENGTH {
            return Err(ValidationError::TooLong {
                field: "title",
                max: TITLE_MAX_LENGTH,
            }
            .into());
        }
        Ok(title.to_string())
    }

    /// Trimmed text, `None` when blank
    pub fn optional_text(&self, text: Option<String>) -> Option<String> {
        text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
    }

    pub fn score(&self, score: i64) -> Result<i32, InternalError> {
        if !(SCORE_MIN..=SCORE_MAX).contains(&score) {
            return Err(ValidationError::ScoreOutOfRange { score }.into());
        }
        i32::try_from(score).map_err(|_| ValidationError::ScoreOutOfRange { score }.into())
    }
}

impl Default for InputValidatorProvider {
    fn default() -> Self {
        Self::new()
    }
}
