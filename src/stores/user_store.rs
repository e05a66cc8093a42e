use chrono::Utc;
use sea_orm::sea_query::Condition;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use crate::errors::internal::UserError;
use crate::errors::InternalError;
use crate::types::db::user::{self, ActiveModel, Entity as User};
use crate::types::db::UserRole;

/// Values for a new account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Field changes for an existing account. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password_hash.is_none() && self.role.is_none() && self.is_active.is_none()
    }
}

pub struct UserStore;

impl UserStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn create(&self, conn: &impl ConnectionTrait, new_user: NewUser) -> Result<user::Model, InternalError> {
        let now = Utc::now().timestamp();
        let username = new_user.username.clone();
        let email = new_user.email.clone();

        let model = ActiveModel {
            username: Set(new_user.username),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            role: Set(new_user.role),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        model
            .insert(conn)
            .await
            .map_err(|e| Self::map_unique_violation(e, &username, &email, "create_user"))
    }

    pub async fn find_by_id(&self, conn: &impl ConnectionTrait, user_id: i32) -> Result<Option<user::Model>, InternalError> {
        User::find_by_id(user_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    pub async fn get_by_id(&self, conn: &impl ConnectionTrait, user_id: i32) -> Result<user::Model, InternalError> {
        self.find_by_id(conn, user_id)
            .await?
            .ok_or_else(|| UserError::UserIdNotFound { user_id }.into())
    }

    pub async fn find_by_username(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_username", e))
    }

    /// Email lookups are case-insensitive
    pub async fn find_by_email(&self, conn: &impl ConnectionTrait, email: &str) -> Result<Option<user::Model>, InternalError> {
        User::find()
            .filter(user::Column::Email.eq(email.to_lowercase()))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))
    }

    /// All users, newest first
    pub async fn list(&self, conn: &impl ConnectionTrait) -> Result<Vec<user::Model>, InternalError> {
        User::find()
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_users", e))
    }

    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        existing: user::Model,
        changes: UserChanges,
    ) -> Result<user::Model, InternalError> {
        if changes.is_empty() {
            return Ok(existing);
        }
        let username = existing.username.clone();
        let email_for_error = changes.email.clone().unwrap_or_else(|| existing.email.clone());

        let mut model: ActiveModel = existing.into();
        if let Some(email) = changes.email {
            model.email = Set(email);
        }
        if let Some(password_hash) = changes.password_hash {
            model.password_hash = Set(password_hash);
        }
        if let Some(role) = changes.role {
            model.role = Set(role);
        }
        if let Some(is_active) = changes.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(Utc::now().timestamp());

        model
            .update(conn)
            .await
            .map_err(|e| Self::map_unique_violation(e, &username, &email_for_error, "update_user"))
    }

    /// True when at least one active admin exists
    pub async fn active_admin_exists(&self, conn: &impl ConnectionTrait) -> Result<bool, InternalError> {
        let count = User::find()
            .filter(
                Condition::all()
                    .add(user::Column::Role.eq(UserRole::Admin))
                    .add(user::Column::IsActive.eq(true)),
            )
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_admins", e))?;

        Ok(count > 0)
    }

    fn map_unique_violation(err: DbErr, username: &str, email: &str, operation: &str) -> InternalError {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message)) if message.contains("email") => {
                UserError::DuplicateEmail { email: email.to_string() }.into()
            }
            Some(SqlErr::UniqueConstraintViolation(_)) => UserError::DuplicateUsername {
                username: username.to_string(),
            }
            .into(),
            _ => InternalError::database(operation, err),
        }
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_test_db;

    fn new_user(username: &str, role: UserRole) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: "hash".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let db = setup_test_db().await;
        let store = UserStore::new();

        let created = store.create(&db, new_user("alice", UserRole::Admin)).await.unwrap();
        assert!(created.is_active);
        assert_eq!(created.role, UserRole::Admin);

        let by_name = store.find_by_username(&db, "alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);
        let by_email = store.find_by_email(&db, "ALICE@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);
        assert!(store.find_by_username(&db, "bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email() {
        let db = setup_test_db().await;
        let store = UserStore::new();
        store.create(&db, new_user("alice", UserRole::Reviewer)).await.unwrap();

        let result = store.create(&db, new_user("alice", UserRole::Reviewer)).await;
        assert!(matches!(result, Err(InternalError::User(UserError::DuplicateUsername { .. }))));

        let mut other = new_user("alice2", UserRole::Reviewer);
        other.email = "alice@example.com".to_string();
        let result = store.create(&db, other).await;
        assert!(matches!(result, Err(InternalError::User(UserError::DuplicateEmail { .. }))));
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let db = setup_test_db().await;
        let result = UserStore::new().get_by_id(&db, 999).await;
        assert!(matches!(
            result,
            Err(InternalError::User(UserError::UserIdNotFound { user_id: 999 }))
        ));
    }

    #[tokio::test]
    async fn test_update_applies_only_given_fields() {
        let db = setup_test_db().await;
        let store = UserStore::new();
        let created = store.create(&db, new_user("carol", UserRole::Reviewer)).await.unwrap();

        let updated = store
            .update(
                &db,
                created.clone(),
                UserChanges {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(!updated.is_active);
        assert_eq!(updated.email, created.email);
        assert_eq!(updated.password_hash, created.password_hash);
        assert_eq!(updated.role, UserRole::Reviewer);
    }

    #[tokio::test]
    async fn test_active_admin_exists() {
        let db = setup_test_db().await;
        let store = UserStore::new();
        assert!(!store.active_admin_exists(&db).await.unwrap());

        store.create(&db, new_user("rev", UserRole::Reviewer)).await.unwrap();
        assert!(!store.active_admin_exists(&db).await.unwrap());

        let admin = store.create(&db, new_user("root", UserRole::Admin)).await.unwrap();
        assert!(store.active_admin_exists(&db).await.unwrap());

        store
            .update(&db, admin, UserChanges { is_active: Some(false), ..Default::default() })
            .await
            .unwrap();
        assert!(!store.active_admin_exists(&db).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = setup_test_db().await;
        let store = UserStore::new();
        store.create(&db, new_user("first", UserRole::Reviewer)).await.unwrap();
        store.create(&db, new_user("second", UserRole::Reviewer)).await.unwrap();

        let names: Vec<String> = store.list(&db).await.unwrap().into_iter().map(|u| u.username).collect();
        assert_eq!(names, vec!["second".to_string(), "first".to_string()]);
    }
}
