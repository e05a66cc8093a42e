pub mod auth;
pub mod context;
pub mod review_stats;

pub use auth::{Actor, Claims};
pub use context::{RequestContext, RequestId, RequestSource};
pub use review_stats::ScoreSummary;
