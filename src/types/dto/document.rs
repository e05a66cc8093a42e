use poem_openapi::types::multipart::Upload;
use poem_openapi::{ApiResponse, Enum, Multipart, Object};
use poem_openapi::payload::Json;

use crate::types::db::{document, DocumentStatus};
use crate::types::dto::review::ReviewResponse;
use crate::types::internal::ScoreSummary;

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
#[oai(rename_all = "lowercase")]
pub enum DocumentState {
    Pending,
    Reviewed,
}

impl From<DocumentStatus> for DocumentState {
    fn from(status: DocumentStatus) -> Self {
        match status {
            DocumentStatus::Pending => DocumentState::Pending,
            DocumentStatus::Reviewed => DocumentState::Reviewed,
        }
    }
}

/// Multipart upload form
#[derive(Multipart, Debug)]
pub struct UploadDocumentForm {
    /// Required, at most 200 characters
    pub title: Option<String>,

    pub description: Option<String>,

    pub file: Option<Upload>,
}

#[derive(Object, Debug, Clone)]
pub struct DocumentSummary {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    /// Original (sanitized) file name, used for downloads
    pub filename: String,
    pub status: DocumentState,
    pub uploader_id: i32,
    pub uploader_username: String,
    /// Number of completed reviews
    pub review_count: u64,
    /// Mean of completed review scores, two decimals
    pub average_score: Option<f64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl DocumentSummary {
    pub fn from_parts(model: document::Model, uploader_username: String, scores: ScoreSummary) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            filename: model.filename,
            status: model.status.into(),
            uploader_id: model.uploader_id,
            uploader_username,
            review_count: scores.review_count,
            average_score: scores.average_score,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentSummary>,
}

#[derive(Object, Debug)]
pub struct DocumentDetailResponse {
    pub document: DocumentSummary,

    /// Every review of the document, newest first
    pub reviews: Vec<ReviewResponse>,

    /// The caller's own review, if any
    pub my_review: Option<ReviewResponse>,
}

#[derive(ApiResponse)]
pub enum UploadDocumentApiResponse {
    /// Document stored, pending review
    #[oai(status = 201)]
    Created(Json<DocumentSummary>),
}

#[derive(Object, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentTotals {
    pub total: u64,
    pub pending: u64,
    pub reviewed: u64,
}

#[derive(Object, Debug)]
pub struct AdminDashboard {
    pub totals: DocumentTotals,

    /// All documents, newest first
    pub documents: Vec<DocumentSummary>,
}

#[derive(Object, Debug)]
pub struct ReviewerDashboard {
    /// Documents the caller has not reviewed yet
    pub to_review: Vec<DocumentSummary>,

    /// Documents the caller has already reviewed
    pub reviewed: Vec<DocumentSummary>,
}

/// Role-specific dashboard. Exactly one of `admin` / `reviewer` is set.
#[derive(Object, Debug)]
pub struct DashboardResponse {
    pub admin: Option<AdminDashboard>,
    pub reviewer: Option<ReviewerDashboard>,
}
