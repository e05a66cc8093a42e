use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthorizationError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Permission denied: {action}")]
    Forbidden { action: String },

    #[error("Cannot change your own role or active status")]
    SelfModificationDenied,
}

impl AuthorizationError {
    pub fn forbidden(action: impl Into<String>) -> Self {
        Self::Forbidden {
            action: action.into(),
        }
    }
}
