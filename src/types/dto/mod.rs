pub mod auth;
pub mod common;
pub mod document;
pub mod review;
pub mod user;

pub use auth::{LoginRequest, LoginResponse, LogoutResponse, WhoAmIResponse};
pub use common::{HealthResponse, MessageResponse};
pub use document::{
    AdminDashboard, DashboardResponse, DocumentDetailResponse, DocumentListResponse, DocumentState,
    DocumentSummary, DocumentTotals, ReviewerDashboard, UploadDocumentApiResponse, UploadDocumentForm,
};
pub use review::{ReviewResponse, ReviewState, SubmitReviewApiResponse, SubmitReviewRequest};
pub use user::{CreateUserApiResponse, CreateUserRequest, Role, UpdateUserRequest, UserListResponse, UserResponse};
