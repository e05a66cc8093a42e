use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Review not found for document {document_id} and reviewer {reviewer_id}")]
    NotFound { document_id: i32, reviewer_id: i32 },
}
