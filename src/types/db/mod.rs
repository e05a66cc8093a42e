// Database entities - SeaORM models
pub mod document;
pub mod review;
pub mod session;
pub mod user;

pub use document::DocumentStatus;
pub use review::ReviewStatus;
pub use user::UserRole;
