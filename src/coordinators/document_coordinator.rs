use std::collections::HashMap;
use std::sync::Arc;

use crate::app_data::AppData;
use crate::config::{begin_transaction, commit_transaction};
use crate::errors::InternalError;
use crate::providers::{Action, AuthorizationProvider, FileStorageProvider, InputValidatorProvider};
use crate::stores::{DocumentStore, NewDocument, ReviewStore};
use crate::types::db::{document, user, DocumentStatus};
use crate::types::dto::{
    AdminDashboard, DashboardResponse, DocumentDetailResponse, DocumentSummary, DocumentTotals, ReviewResponse,
    ReviewerDashboard,
};
use crate::types::internal::context::RequestContext;
use crate::types::internal::ScoreSummary;

/// Upload form contents after the multipart body was read
#[derive(Debug, Clone, Default)]
pub struct UploadInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}

/// A stored file ready to be sent back
#[derive(Debug)]
pub struct DownloadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Orchestrates upload, listing, detail, download, deletion and the dashboard
pub struct DocumentCoordinator {
    app_data: Arc<AppData>,
    document_store: Arc<DocumentStore>,
    review_store: Arc<ReviewStore>,
    file_storage: FileStorageProvider,
    authorization_provider: AuthorizationProvider,
    input_validator: InputValidatorProvider,
}

impl DocumentCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            document_store: app_data.document_store.clone(),
            review_store: app_data.review_store.clone(),
            file_storage: FileStorageProvider::new(&app_data.settings),
            authorization_provider: AuthorizationProvider::new(),
            input_validator: InputValidatorProvider::new(),
            app_data,
        }
    }

    /// Validate, store the file, then insert the row. Nothing is written
    /// when validation fails, and the file is removed when the row is not
    /// committed.
    pub async fn upload(&self, ctx: &RequestContext, input: UploadInput) -> Result<DocumentSummary, InternalError> {
        let actor = ctx.actor()?;
        self.authorization_provider.authorize(actor, Action::UploadDocument)?;

        let title = self.input_validator.title(input.title.as_deref())?;
        let candidate = self.file_storage.check_file_name(input.file_name.as_deref())?;
        self.file_storage.check_size(input.data.len())?;
        let description = self.input_validator.optional_text(input.description);

        let stored_path = self.file_storage.store(&candidate.extension, &input.data).await?;
        let filepath = stored_path.to_string_lossy().to_string();

        let inserted = self
            .insert_document(NewDocument {
                title,
                description,
                filename: candidate.filename,
                filepath: filepath.clone(),
                uploader_id: actor.user_id,
            })
            .await;

        let document = match inserted {
            Ok(document) => document,
            Err(e) => {
                tracing::error!(request_id = %ctx.request_id, "Saving document row failed, removing {}: {}", filepath, e);
                if let Err(remove_err) = self.file_storage.remove(&filepath).await {
                    tracing::error!("Removing orphaned upload {} failed: {}", filepath, remove_err);
                }
                return Err(e);
            }
        };

        tracing::info!(
            request_id = %ctx.request_id,
            user_id = actor.user_id,
            document_id = document.id,
            "Uploaded '{}' ({} bytes)",
            document.filename,
            input.data.len()
        );
        Ok(DocumentSummary::from_parts(document, actor.username.clone(), ScoreSummary::default()))
    }

    async fn insert_document(&self, new_document: NewDocument) -> Result<document::Model, InternalError> {
        let txn = begin_transaction(&self.app_data.db).await?;
        let document = self.document_store.insert(&txn, new_document).await?;
        commit_transaction(txn).await?;
        Ok(document)
    }

    /// All documents, newest first
    pub async fn list_documents(&self, ctx: &RequestContext) -> Result<Vec<DocumentSummary>, InternalError> {
        let actor = ctx.actor()?;
        self.authorization_provider.authorize(actor, Action::ViewDocuments)?;
        self.summaries().await
    }

    async fn summaries(&self) -> Result<Vec<DocumentSummary>, InternalError> {
        let rows = self.document_store.list_with_uploader(&self.app_data.db).await?;
        let ids: Vec<i32> = rows.iter().map(|(d, _)| d.id).collect();
        let scores = self.review_store.score_summaries(&self.app_data.db, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|(document, uploader)| Self::summarize(document, uploader, &scores))
            .collect())
    }

    fn summarize(
        document: document::Model,
        uploader: Option<user::Model>,
        scores: &HashMap<i32, ScoreSummary>,
    ) -> DocumentSummary {
        let summary = scores.get(&document.id).copied().unwrap_or_default();
        let uploader_username = uploader.map(|u| u.username).unwrap_or_default();
        DocumentSummary::from_parts(document, uploader_username, summary)
    }

    /// Document with every review, the caller's own review and the average score
    pub async fn document_detail(&self, ctx: &RequestContext, document_id: i32) -> Result<DocumentDetailResponse, InternalError> {
        let actor = ctx.actor()?;
        self.authorization_provider.authorize(actor, Action::ViewDocuments)?;

        let (document, uploader) = self
            .document_store
            .get_with_uploader(&self.app_data.db, document_id)
            .await?;
        let scores = self.review_store.score_summaries(&self.app_data.db, &[document.id]).await?;

        let reviews: Vec<ReviewResponse> = self
            .review_store
            .list_for_document(&self.app_data.db, document.id)
            .await?
            .into_iter()
            .map(|(review, reviewer)| {
                ReviewResponse::from_parts(review, reviewer.map(|r| r.username).unwrap_or_default())
            })
            .collect();
        let my_review = reviews.iter().find(|r| r.reviewer_id == actor.user_id).cloned();

        Ok(DocumentDetailResponse {
            document: Self::summarize(document, uploader, &scores),
            reviews,
            my_review,
        })
    }

    pub async fn download(&self, ctx: &RequestContext, document_id: i32) -> Result<DownloadedFile, InternalError> {
        let actor = ctx.actor()?;
        self.authorization_provider.authorize(actor, Action::DownloadDocument)?;

        let document = self.document_store.get_by_id(&self.app_data.db, document_id).await?;
        let data = self.file_storage.read(&document.filepath).await?;

        tracing::debug!(request_id = %ctx.request_id, document_id, "Serving download");
        Ok(DownloadedFile {
            filename: document.filename,
            data,
        })
    }

    /// Delete the document and its reviews, then the stored file
    pub async fn delete_document(&self, ctx: &RequestContext, document_id: i32) -> Result<(), InternalError> {
        let actor = ctx.actor()?;
        self.authorization_provider.authorize(actor, Action::DeleteDocument)?;

        let txn = begin_transaction(&self.app_data.db).await?;
        let document = self.document_store.get_by_id(&txn, document_id).await?;
        let removed_reviews = self.review_store.delete_for_document(&txn, document.id).await?;
        self.document_store.delete(&txn, document.id).await?;
        commit_transaction(txn).await?;

        if let Err(e) = self.file_storage.remove(&document.filepath).await {
            tracing::error!(document_id, "Document deleted but its file could not be removed: {}", e);
        }

        tracing::info!(
            request_id = %ctx.request_id,
            user_id = actor.user_id,
            document_id,
            "Deleted document '{}' and {} reviews",
            document.title,
            removed_reviews
        );
        Ok(())
    }

    /// Totals and all documents for admins; to-do and done lists for reviewers
    pub async fn dashboard(&self, ctx: &RequestContext) -> Result<DashboardResponse, InternalError> {
        let actor = ctx.actor()?;
        self.authorization_provider.authorize(actor, Action::ViewDashboard)?;

        let documents = self.summaries().await?;

        if actor.is_admin() {
            let totals = DocumentTotals {
                total: self.document_store.count_all(&self.app_data.db).await?,
                pending: self
                    .document_store
                    .count_by_status(&self.app_data.db, DocumentStatus::Pending)
                    .await?,
                reviewed: self
                    .document_store
                    .count_by_status(&self.app_data.db, DocumentStatus::Reviewed)
                    .await?,
            };
            return Ok(DashboardResponse {
                admin: Some(AdminDashboard { totals, documents }),
                reviewer: None,
            });
        }

        let reviewed_ids = self
            .review_store
            .reviewed_document_ids(&self.app_data.db, actor.user_id)
            .await?;
        let (reviewed, to_review): (Vec<_>, Vec<_>) =
            documents.into_iter().partition(|d| reviewed_ids.contains(&d.id));

        Ok(DashboardResponse {
            admin: None,
            reviewer: Some(ReviewerDashboard { to_review, reviewed }),
        })
    }

}
