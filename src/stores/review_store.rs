use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::errors::internal::ReviewError;
use crate::errors::InternalError;
use crate::types::db::review::{self, ActiveModel, Entity as Review};
use crate::types::db::{user, ReviewStatus};
use crate::types::internal::ScoreSummary;

pub struct ReviewStore;

impl ReviewStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_for_reviewer(
        &self,
        conn: &impl ConnectionTrait,
        document_id: i32,
        reviewer_id: i32,
    ) -> Result<Option<review::Model>, InternalError> {
        Review::find()
            .filter(review::Column::DocumentId.eq(document_id))
            .filter(review::Column::ReviewerId.eq(reviewer_id))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_review_for_reviewer", e))
    }

    pub async fn get_for_reviewer(
        &self,
        conn: &impl ConnectionTrait,
        document_id: i32,
        reviewer_id: i32,
    ) -> Result<review::Model, InternalError> {
        self.find_for_reviewer(conn, document_id, reviewer_id)
            .await?
            .ok_or_else(|| ReviewError::NotFound { document_id, reviewer_id }.into())
    }

    /// Insert a submitted (completed) review
    pub async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        document_id: i32,
        reviewer_id: i32,
        score: i32,
        comment: Option<String>,
    ) -> Result<review::Model, InternalError> {
        let now = Utc::now().timestamp();
        let model = ActiveModel {
            document_id: Set(document_id),
            reviewer_id: Set(reviewer_id),
            score: Set(score),
            comment: Set(comment),
            status: Set(ReviewStatus::Completed),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        model
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_review", e))
    }

    /// Overwrite score and comment of an existing review in place
    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        existing: review::Model,
        score: i32,
        comment: Option<String>,
    ) -> Result<review::Model, InternalError> {
        let mut model: ActiveModel = existing.into();
        model.score = Set(score);
        model.comment = Set(comment);
        model.status = Set(ReviewStatus::Completed);
        model.updated_at = Set(Utc::now().timestamp());

        model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_review", e))
    }

    /// Reviews of a document with their reviewers, newest first
    pub async fn list_for_document(
        &self,
        conn: &impl ConnectionTrait,
        document_id: i32,
    ) -> Result<Vec<(review::Model, Option<user::Model>)>, InternalError> {
        Review::find()
            .filter(review::Column::DocumentId.eq(document_id))
            .find_also_related(user::Entity)
            .order_by_desc(review::Column::UpdatedAt)
            .order_by_desc(review::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_reviews_for_document", e))
    }

    /// Completed-review count and average score per document
    pub async fn score_summaries(
        &self,
        conn: &impl ConnectionTrait,
        document_ids: &[i32],
    ) -> Result<HashMap<i32, ScoreSummary>, InternalError> {
        if document_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i32, i32)> = Review::find()
            .select_only()
            .column(review::Column::DocumentId)
            .column(review::Column::Score)
            .filter(review::Column::DocumentId.is_in(document_ids.iter().copied()))
            .filter(review::Column::Status.eq(ReviewStatus::Completed))
            .into_tuple()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("score_summaries", e))?;

        let mut scores: HashMap<i32, Vec<i32>> = HashMap::new();
        for (document_id, score) in rows {
            scores.entry(document_id).or_default().push(score);
        }

        Ok(scores
            .into_iter()
            .map(|(document_id, scores)| (document_id, ScoreSummary::from_scores(&scores)))
            .collect())
    }

    /// Ids of documents the reviewer has reviewed
    pub async fn reviewed_document_ids(
        &self,
        conn: &impl ConnectionTrait,
        reviewer_id: i32,
    ) -> Result<HashSet<i32>, InternalError> {
        let ids: Vec<i32> = Review::find()
            .select_only()
            .column(review::Column::DocumentId)
            .filter(review::Column::ReviewerId.eq(reviewer_id))
            .into_tuple()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("reviewed_document_ids", e))?;

        Ok(ids.into_iter().collect())
    }

    pub async fn delete_for_document(&self, conn: &impl ConnectionTrait, document_id: i32) -> Result<u64, InternalError> {
        let result = Review::delete_many()
            .filter(review::Column::DocumentId.eq(document_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_reviews_for_document", e))?;

        Ok(result.rows_affected)
    }
}

impl Default for ReviewStore {
    fn default() -> Self {
        Self::new()
    }
}
