// Common test utilities for integration tests
#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use docreview_backend::config::{ApplicationSettings, SecretManager};
use docreview_backend::AppData;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

pub const TEST_SESSION_SECRET: &str = "integration-session-secret-32-chars-long";
pub const TEST_PEPPER: &str = "integration-pepper-16";

/// In-memory database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// AppData storing uploads under `upload_dir`
pub async fn setup_test_app(upload_dir: &Path, bootstrap_password: Option<&str>) -> Arc<AppData> {
    let db = setup_test_db().await;
    let settings = ApplicationSettings::new("sqlite::memory:", upload_dir);
    let secrets = SecretManager::from_values(TEST_SESSION_SECRET, TEST_PEPPER, bootstrap_password)
        .expect("valid test secrets");
    Arc::new(AppData::new(db, settings, secrets))
}

/// Helper to manage environment variables in tests
///
/// Cleans up specified environment variables on creation and drop,
/// ensuring test isolation when dealing with global environment state.
pub struct EnvGuard {
    vars: Vec<String>,
}

impl EnvGuard {
    pub fn new(vars: Vec<&str>) -> Self {
        for var in &vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
        Self {
            vars: vars.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in &self.vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }
}

/// Environment variables are process-global, so tests that modify them
/// must run serially.
pub static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());
