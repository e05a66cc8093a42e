use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Document not found: {document_id}")]
    NotFound { document_id: i32 },
}
