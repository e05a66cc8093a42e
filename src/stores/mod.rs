// Stores layer - data access over SeaORM connections or transactions
pub mod document_store;
pub mod review_store;
pub mod session_store;
pub mod user_store;

pub use document_store::{DocumentStore, NewDocument};
pub use review_store::ReviewStore;
pub use session_store::SessionStore;
pub use user_store::{NewUser, UserChanges, UserStore};
