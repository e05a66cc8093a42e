// Coordinators layer - workflow orchestration
//
// Coordinators compose store and provider operations for specific API
// endpoints: authorize, validate, then mutate inside a transaction.

pub mod auth_coordinator;
pub mod document_coordinator;
pub mod review_coordinator;
pub mod user_coordinator;

pub use auth_coordinator::AuthCoordinator;
pub use document_coordinator::{DocumentCoordinator, DownloadedFile, UploadInput};
pub use review_coordinator::{ReviewCoordinator, ReviewOutcome};
pub use user_coordinator::{CreateUserInput, UpdateUserInput, UserCoordinator};

#[cfg(test)]
mod review_coordinator_test;
