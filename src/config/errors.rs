use thiserror::Error;

use crate::config::secret_manager::SecretError;

/// Failures while loading startup configuration
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Invalid setting '{setting_name}': {reason}")]
    InvalidSetting { setting_name: String, reason: String },

    #[error("Failed to parse setting '{setting_name}': {error}")]
    ParseError { setting_name: String, error: String },

    #[error(transparent)]
    Secret(#[from] SecretError),
}
