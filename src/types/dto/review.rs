use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Enum, Object};

use crate::types::db::{review, ReviewStatus};

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
#[oai(rename_all = "lowercase")]
pub enum ReviewState {
    Pending,
    Completed,
}

impl From<ReviewStatus> for ReviewState {
    fn from(status: ReviewStatus) -> Self {
        match status {
            ReviewStatus::Pending => ReviewState::Pending,
            ReviewStatus::Completed => ReviewState::Completed,
        }
    }
}

#[derive(Object, Debug)]
pub struct SubmitReviewRequest {
    /// Integer from 0 to 100
    pub score: i64,

    pub comment: Option<String>,
}

#[derive(Object, Debug, Clone)]
pub struct ReviewResponse {
    pub id: i32,
    pub document_id: i32,
    pub reviewer_id: i32,
    pub reviewer_username: String,
    pub score: i32,
    pub comment: Option<String>,
    pub status: ReviewState,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ReviewResponse {
    pub fn from_parts(model: review::Model, reviewer_username: String) -> Self {
        Self {
            id: model.id,
            document_id: model.document_id,
            reviewer_id: model.reviewer_id,
            reviewer_username,
            score: model.score,
            comment: model.comment,
            status: model.status.into(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(ApiResponse)]
pub enum SubmitReviewApiResponse {
    /// First review of this document by the caller
    #[oai(status = 201)]
    Created(Json<ReviewResponse>),

    /// The caller's existing review was updated in place
    #[oai(status = 200)]
    Updated(Json<ReviewResponse>),
}
