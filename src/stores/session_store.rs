use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::types::db::session::{self, ActiveModel, Entity as Session};

/// Server-side session rows backing issued session tokens
pub struct SessionStore;

impl SessionStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
        ttl_seconds: i64,
    ) -> Result<session::Model, InternalError> {
        let now = Utc::now().timestamp();
        let model = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id),
            created_at: Set(now),
            expires_at: Set(now.saturating_add(ttl_seconds)),
        };

        model
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("create_session", e))
    }

    pub async fn find(&self, conn: &impl ConnectionTrait, session_id: &str) -> Result<Option<session::Model>, InternalError> {
        Session::find_by_id(session_id.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_session", e))
    }

    /// Returns whether a row was deleted
    pub async fn delete(&self, conn: &impl ConnectionTrait, session_id: &str) -> Result<bool, InternalError> {
        let result = Session::delete_by_id(session_id.to_string())
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_session", e))?;
        Ok(result.rows_affected > 0)
    }

    pub async fn delete_for_user(&self, conn: &impl ConnectionTrait, user_id: i32) -> Result<u64, InternalError> {
        let result = Session::delete_many()
            .filter(session::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_sessions_for_user", e))?;
        Ok(result.rows_affected)
    }

    pub async fn delete_expired(&self, conn: &impl ConnectionTrait) -> Result<u64, InternalError> {
        let result = Session::delete_many()
            .filter(session::Column::ExpiresAt.lte(Utc::now().timestamp()))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_expired_sessions", e))?;
        Ok(result.rows_affected)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{insert_test_user, setup_test_db};
    use crate::types::db::UserRole;

    #[tokio::test]
    async fn test_create_find_delete() {
        let db = setup_test_db().await;
        let user = insert_test_user(&db, "rita", UserRole::Reviewer).await;
        let store = SessionStore::new();

        let session = store.create(&db, user.id, 3600).await.unwrap();
        assert_eq!(session.expires_at - session.created_at, 3600);
        assert!(store.find(&db, &session.id).await.unwrap().is_some());

        assert!(store.delete(&db, &session.id).await.unwrap());
        assert!(!store.delete(&db, &session.id).await.unwrap());
        assert!(store.find(&db, &session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_for_user_and_expired() {
        let db = setup_test_db().await;
        let user = insert_test_user(&db, "rita", UserRole::Reviewer).await;
        let other = insert_test_user(&db, "rob", UserRole::Reviewer).await;
        let store = SessionStore::new();

        store.create(&db, user.id, 3600).await.unwrap();
        store.create(&db, user.id, 3600).await.unwrap();
        let kept = store.create(&db, other.id, 3600).await.unwrap();
        let expired = store.create(&db, other.id, -10).await.unwrap();

        assert_eq!(store.delete_for_user(&db, user.id).await.unwrap(), 2);
        assert_eq!(store.delete_expired(&db).await.unwrap(), 1);
        assert!(store.find(&db, &kept.id).await.unwrap().is_some());
        assert!(store.find(&db, &expired.id).await.unwrap().is_none());
    }
}
