// Test utilities shared by unit tests
// Only compiled when running tests

use std::path::Path;
use std::sync::Arc;

use sea_orm::{Database, DatabaseConnection};
use migration::{Migrator, MigratorTrait};

use crate::app_data::AppData;
use crate::config::{ApplicationSettings, SecretManager};
use crate::providers::CryptoProvider;
use crate::stores::{NewUser, UserStore};
use crate::types::db::{user, UserRole};
use crate::types::internal::{Actor, RequestContext};

pub const TEST_SESSION_SECRET: &str = "test-session-secret-minimum-32-characters";
pub const TEST_PEPPER: &str = "test-pepper-for-unit-tests";

/// In-memory SQLite with all migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub fn test_secret_manager() -> Arc<SecretManager> {
    Arc::new(SecretManager::from_values(TEST_SESSION_SECRET, TEST_PEPPER, None).expect("valid test secrets"))
}

/// AppData over a fresh database, storing uploads under `upload_dir`
pub async fn setup_test_app(upload_dir: &Path) -> Arc<AppData> {
    let db = setup_test_db().await;
    let settings = ApplicationSettings::new("sqlite::memory:", upload_dir);
    let secrets = SecretManager::from_values(TEST_SESSION_SECRET, TEST_PEPPER, None).expect("valid test secrets");
    Arc::new(AppData::new(db, settings, secrets))
}

/// User with a placeholder hash, for tests that never log in
pub async fn insert_test_user(db: &DatabaseConnection, username: &str, role: UserRole) -> user::Model {
    UserStore::new()
        .create(
            db,
            NewUser {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password_hash: "not-a-real-hash".to_string(),
                role,
            },
        )
        .await
        .expect("Failed to insert test user")
}

/// User whose password hashes with the test pepper
pub async fn insert_user_with_password(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
    role: UserRole,
) -> user::Model {
    let password_hash = CryptoProvider::new(test_secret_manager())
        .hash_password(password)
        .await
        .expect("Failed to hash test password");

    UserStore::new()
        .create(
            db,
            NewUser {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password_hash,
                role,
            },
        )
        .await
        .expect("Failed to insert test user")
}

/// Context authenticated as `user`, bypassing the session lookup
pub fn context_for(user: &user::Model) -> RequestContext {
    RequestContext::for_system().with_actor(Actor {
        user_id: user.id,
        username: user.username.clone(),
        role: user.role,
        session_id: "test-session".to_string(),
    })
}
