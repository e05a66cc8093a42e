use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::errors::internal::DocumentError;
use crate::errors::InternalError;
use crate::types::db::document::{self, ActiveModel, Entity as Document};
use crate::types::db::{user, DocumentStatus};

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub description: Option<String>,
    pub filename: String,
    pub filepath: String,
    pub uploader_id: i32,
}

pub struct DocumentStore;

impl DocumentStore {
    pub fn new() -> Self {
        Self
    }

    /// Insert a document in `pending` state
    pub async fn insert(&self, conn: &impl ConnectionTrait, new_document: NewDocument) -> Result<document::Model, InternalError> {
        let now = Utc::now().timestamp();
        let model = ActiveModel {
            title: Set(new_document.title),
            description: Set(new_document.description),
            filename: Set(new_document.filename),
            filepath: Set(new_document.filepath),
            uploader_id: Set(new_document.uploader_id),
            status: Set(DocumentStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        model
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_document", e))
    }

    pub async fn find_by_id(&self, conn: &impl ConnectionTrait, document_id: i32) -> Result<Option<document::Model>, InternalError> {
        Document::find_by_id(document_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_document_by_id", e))
    }

    pub async fn get_by_id(&self, conn: &impl ConnectionTrait, document_id: i32) -> Result<document::Model, InternalError> {
        self.find_by_id(conn, document_id)
            .await?
            .ok_or_else(|| DocumentError::NotFound { document_id }.into())
    }

    /// Document together with its uploader
    pub async fn get_with_uploader(
        &self,
        conn: &impl ConnectionTrait,
        document_id: i32,
    ) -> Result<(document::Model, Option<user::Model>), InternalError> {
        Document::find_by_id(document_id)
            .find_also_related(user::Entity)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_document_with_uploader", e))?
            .ok_or_else(|| DocumentError::NotFound { document_id }.into())
    }

    /// All documents with their uploaders, newest first
    pub async fn list_with_uploader(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<Vec<(document::Model, Option<user::Model>)>, InternalError> {
        Document::find()
            .find_also_related(user::Entity)
            .order_by_desc(document::Column::CreatedAt)
            .order_by_desc(document::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_documents", e))
    }

    pub async fn count_all(&self, conn: &impl ConnectionTrait) -> Result<u64, InternalError> {
        Document::find()
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_documents", e))
    }

    pub async fn count_by_status(&self, conn: &impl ConnectionTrait, status: DocumentStatus) -> Result<u64, InternalError> {
        Document::find()
            .filter(document::Column::Status.eq(status))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_documents_by_status", e))
    }

    /// Move a pending document to `reviewed`. Returns the model unchanged when it already is.
    pub async fn mark_reviewed(&self, conn: &impl ConnectionTrait, existing: document::Model) -> Result<document::Model, InternalError> {
        if existing.status == DocumentStatus::Reviewed {
            return Ok(existing);
        }
        let mut model: ActiveModel = existing.into();
        model.status = Set(DocumentStatus::Reviewed);
        model.updated_at = Set(Utc::now().timestamp());

        model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("mark_document_reviewed", e))
    }

    pub async fn delete(&self, conn: &impl ConnectionTrait, document_id: i32) -> Result<(), InternalError> {
        let result = Document::delete_by_id(document_id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_document", e))?;

        if result.rows_affected == 0 {
            return Err(DocumentError::NotFound { document_id }.into());
        }
        Ok(())
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}
