#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Encoding session token failed: {message}")]
    EncodeToken { message: String },

    #[error("crypto failure during {operation}: {message}")]
    Other {
        operation: &'static str,
        message: String,
    },
}

impl CryptoError {
    pub fn other(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Other {
            operation,
            message: message.into(),
        }
    }
}
