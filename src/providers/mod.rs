// Providers layer - work performers and business rules
//
// Providers hold the reusable operations (hashing, tokens, authorization,
// validation, file storage) that coordinators compose into workflows.

pub mod authentication_provider;
pub mod authorization_provider;
pub mod crypto_provider;
pub mod file_storage_provider;
pub mod input_validator_provider;
pub mod password_validator_provider;
pub mod token_provider;

pub use authentication_provider::{AuthenticationProvider, IssuedSession};
pub use authorization_provider::{Action, AuthorizationProvider};
pub use crypto_provider::CryptoProvider;
pub use file_storage_provider::{FileStorageProvider, UploadCandidate};
pub use input_validator_provider::InputValidatorProvider;
pub use password_validator_provider::{PasswordValidationError, PasswordValidatorProvider};
pub use token_provider::TokenProvider;
