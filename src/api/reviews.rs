use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::payload::Json;
use poem_openapi::{OpenApi, Tags};

use crate::api::auth::SessionAuth;
use crate::api::helpers;
use crate::coordinators::{AuthCoordinator, ReviewCoordinator, ReviewOutcome};
use crate::errors::ApiError;
use crate::types::dto::{ReviewResponse, SubmitReviewApiResponse, SubmitReviewRequest};

/// The caller's review of a document
pub struct ReviewApi {
    auth_coordinator: Arc<AuthCoordinator>,
    review_coordinator: Arc<ReviewCoordinator>,
}

impl ReviewApi {
    pub fn new(auth_coordinator: Arc<AuthCoordinator>, review_coordinator: Arc<ReviewCoordinator>) -> Self {
        Self {
            auth_coordinator,
            review_coordinator,
        }
    }
}

#[derive(Tags)]
enum ReviewTags {
    Reviews,
}

#[OpenApi]
impl ReviewApi {
    /// The caller's own review of the document
    #[oai(path = "/documents/:id/review", method = "get", tag = "ReviewTags::Reviews")]
    async fn my_review(&self, req: &Request, auth: SessionAuth, id: Path<i32>) -> Result<Json<ReviewResponse>, ApiError> {
        let ctx = helpers::authenticate(req, &auth, &self.auth_coordinator).await?;
        let review = self.review_coordinator.my_review(&ctx, id.0).await?;
        Ok(Json(review))
    }

    /// Create or update the caller's review (reviewers only)
    ///
    /// Score is an integer from 0 to 100. The first review of a pending
    /// document marks it reviewed.
    #[oai(path = "/documents/:id/review", method = "put", tag = "ReviewTags::Reviews")]
    async fn submit(
        &self,
        req: &Request,
        auth: SessionAuth,
        id: Path<i32>,
        body: Json<SubmitReviewRequest>,
    ) -> Result<SubmitReviewApiResponse, ApiError> {
        let ctx = helpers::authenticate(req, &auth, &self.auth_coordinator).await?;
        let body = body.0;
        let (review, outcome) = self
            .review_coordinator
            .submit_review(&ctx, id.0, body.score, body.comment)
            .await?;

        Ok(match outcome {
            ReviewOutcome::Created => SubmitReviewApiResponse::Created(Json(review)),
            ReviewOutcome::Updated => SubmitReviewApiResponse::Updated(Json(review)),
        })
    }
}
