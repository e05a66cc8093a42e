// API-facing error types
pub mod api_error;
pub mod auth;

// Re-exports for convenience
pub use api_error::ApiError;
pub use auth::AuthError;
