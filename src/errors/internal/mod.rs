use thiserror::Error;

pub mod authorization;
pub mod credential;
pub mod crypto;
pub mod database;
pub mod document;
pub mod review;
pub mod storage;
pub mod user;
pub mod validation;

pub use authorization::AuthorizationError;
pub use credential::CredentialError;
pub use crypto::CryptoError;
pub use database::DatabaseError;
pub use document::DocumentError;
pub use review::ReviewError;
pub use storage::StorageError;
pub use user::UserError;
pub use validation::ValidationError;

/// Internal error type for store, provider and coordinator operations
///
/// Infrastructure errors (Database, Storage, Crypto, Parse) are shared by all layers;
/// domain errors are grouped per entity. Not exposed via API - endpoints must
/// convert to AuthError or ApiError.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Review(#[from] ReviewError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn parse(value_type: impl Into<String>, message: impl Into<String>) -> InternalError {
        InternalError::Parse {
            value_type: value_type.into(),
            message: message.into(),
        }
    }

    /// True for failures the caller caused (bad input, missing entity, denied action)
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            InternalError::Database(_)
                | InternalError::Storage(_)
                | InternalError::Crypto(_)
                | InternalError::Parse { .. }
        )
    }
}
