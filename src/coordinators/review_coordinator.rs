use std::sync::Arc;

use crate::app_data::AppData;
use crate::config::{begin_transaction, commit_transaction};
use crate::errors::InternalError;
use crate::providers::{Action, AuthorizationProvider, InputValidatorProvider};
use crate::stores::{DocumentStore, ReviewStore};
use crate::types::db::DocumentStatus;
use crate::types::dto::ReviewResponse;
use crate::types::internal::context::RequestContext;

/// Whether a submission created the caller's review or replaced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    Created,
    Updated,
}

/// Orchestrates review submission and lookup
pub struct ReviewCoordinator {
    app_data: Arc<AppData>,
    document_store: Arc<DocumentStore>,
    review_store: Arc<ReviewStore>,
    authorization_provider: AuthorizationProvider,
    input_validator: InputValidatorProvider,
}

impl ReviewCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            document_store: app_data.document_store.clone(),
            review_store: app_data.review_store.clone(),
            authorization_provider: AuthorizationProvider::new(),
            input_validator: InputValidatorProvider::new(),
            app_data,
        }
    }

    /// Create or update the caller's review. The first review moves a
    /// pending document to reviewed; later ones leave it there.
    pub async fn submit_review(
        &self,
        ctx: &RequestContext,
        document_id: i32,
        score: i64,
        comment: Option<String>,
    ) -> Result<(ReviewResponse, ReviewOutcome), InternalError> {
        let actor = ctx.actor()?;
        self.authorization_provider.authorize(actor, Action::SubmitReview)?;

        let score = self.input_validator.score(score)?;
        let comment = self.input_validator.optional_text(comment);

        let txn = begin_transaction(&self.app_data.db).await?;
        let document = self.document_store.get_by_id(&txn, document_id).await?;

        let (review, outcome) = match self.review_store.find_for_reviewer(&txn, document.id, actor.user_id).await? {
            Some(existing) => (
                self.review_store.update(&txn, existing, score, comment).await?,
                ReviewOutcome::Updated,
            ),
            None => (
                self.review_store
                    .insert(&txn, document.id, actor.user_id, score, comment)
                    .await?,
                ReviewOutcome::Created,
            ),
        };

        let transitioned = document.status == DocumentStatus::Pending;
        if transitioned {
            self.document_store.mark_reviewed(&txn, document).await?;
        }
        commit_transaction(txn).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            user_id = actor.user_id,
            document_id,
            review_id = review.id,
            "Review {:?} with score {}",
            outcome,
            score
        );
        if transitioned {
            tracing::info!(document_id, "Document moved to reviewed");
        }

        Ok((ReviewResponse::from_parts(review, actor.username.clone()), outcome))
    }

    /// The caller's own review of a document
    pub async fn my_review(&self, ctx: &RequestContext, document_id: i32) -> Result<ReviewResponse, InternalError> {
        let actor = ctx.actor()?;
        self.authorization_provider.authorize(actor, Action::ViewDocuments)?;

        let document = self.document_store.get_by_id(&self.app_data.db, document_id).await?;
        let review = self
            .review_store
            .get_for_reviewer(&self.app_data.db, document.id, actor.user_id)
            .await?;

        Ok(ReviewResponse::from_parts(review, actor.username.clone()))
    }
}
