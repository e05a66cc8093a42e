use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::payload::{Attachment, AttachmentType, Json};
use poem_openapi::{OpenApi, Tags};

use crate::api::auth::SessionAuth;
use crate::api::helpers;
use crate::coordinators::{AuthCoordinator, DocumentCoordinator, UploadInput};
use crate::errors::ApiError;
use crate::types::dto::{
    DocumentDetailResponse, DocumentListResponse, MessageResponse, UploadDocumentApiResponse, UploadDocumentForm,
};

/// Document upload, listing, detail, download and deletion
pub struct DocumentApi {
    auth_coordinator: Arc<AuthCoordinator>,
    document_coordinator: Arc<DocumentCoordinator>,
}

impl DocumentApi {
    pub fn new(auth_coordinator: Arc<AuthCoordinator>, document_coordinator: Arc<DocumentCoordinator>) -> Self {
        Self {
            auth_coordinator,
            document_coordinator,
        }
    }
}

#[derive(Tags)]
enum DocumentTags {
    /// Documents awaiting or having received review
    Documents,
}

#[OpenApi]
impl DocumentApi {
    /// List all documents, newest first
    #[oai(path = "/documents", method = "get", tag = "DocumentTags::Documents")]
    async fn list(&self, req: &Request, auth: SessionAuth) -> Result<Json<DocumentListResponse>, ApiError> {
        let ctx = helpers::authenticate(req, &auth, &self.auth_coordinator).await?;
        let documents = self.document_coordinator.list_documents(&ctx).await?;
        Ok(Json(DocumentListResponse { documents }))
    }

    /// Upload a document (admin only)
    ///
    /// Multipart form with `title`, optional `description` and `file`. The
    /// file extension must be on the allow-list and the size within
    /// `MAX_UPLOAD_BYTES`. New documents start as `pending`.
    #[oai(path = "/documents", method = "post", tag = "DocumentTags::Documents")]
    async fn upload(
        &self,
        req: &Request,
        auth: SessionAuth,
        form: UploadDocumentForm,
    ) -> Result<UploadDocumentApiResponse, ApiError> {
        let ctx = helpers::authenticate(req, &auth, &self.auth_coordinator).await?;

        let (file_name, data) = match form.file {
            Some(upload) => {
                let file_name = upload.file_name().map(str::to_string);
                let data = upload.into_vec().await.map_err(|e| {
                    tracing::warn!(request_id = %ctx.request_id, "Reading upload body failed: {}", e);
                    ApiError::bad_request("Uploaded file could not be read")
                })?;
                (file_name, data)
            }
            None => (None, Vec::new()),
        };

        let summary = self
            .document_coordinator
            .upload(
                &ctx,
                UploadInput {
                    title: form.title,
                    description: form.description,
                    file_name,
                    data,
                },
            )
            .await?;
        Ok(UploadDocumentApiResponse::Created(Json(summary)))
    }

    /// Document detail with all reviews and the caller's own review
    #[oai(path = "/documents/:id", method = "get", tag = "DocumentTags::Documents")]
    async fn detail(&self, req: &Request, auth: SessionAuth, id: Path<i32>) -> Result<Json<DocumentDetailResponse>, ApiError> {
        let ctx = helpers::authenticate(req, &auth, &self.auth_coordinator).await?;
        let detail = self.document_coordinator.document_detail(&ctx, id.0).await?;
        Ok(Json(detail))
    }

    /// Download the stored file under its original name
    #[oai(path = "/documents/:id/download", method = "get", tag = "DocumentTags::Documents")]
    async fn download(&self, req: &Request, auth: SessionAuth, id: Path<i32>) -> Result<Attachment<Vec<u8>>, ApiError> {
        let ctx = helpers::authenticate(req, &auth, &self.auth_coordinator).await?;
        let file = self.document_coordinator.download(&ctx, id.0).await?;
        Ok(Attachment::new(file.data)
            .attachment_type(AttachmentType::Attachment)
            .filename(file.filename))
    }

    /// Delete a document, its reviews and its file (admin only)
    #[oai(path = "/documents/:id", method = "delete", tag = "DocumentTags::Documents")]
    async fn delete(&self, req: &Request, auth: SessionAuth, id: Path<i32>) -> Result<Json<MessageResponse>, ApiError> {
        let ctx = helpers::authenticate(req, &auth, &self.auth_coordinator).await?;
        self.document_coordinator.delete_document(&ctx, id.0).await?;
        Ok(Json(MessageResponse::new("Document deleted")))
    }
}
