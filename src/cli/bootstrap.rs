// Bootstrap command implementation
// Seeds the first admin account so a fresh install can be logged into

use std::sync::Arc;

use crate::app_data::AppData;
use crate::coordinators::{CreateUserInput, UserCoordinator};
use crate::errors::InternalError;
use crate::providers::CryptoProvider;
use crate::types::db::{user, UserRole};
use crate::types::internal::context::RequestContext;

pub const BOOTSTRAP_ADMIN_USERNAME: &str = "admin";
pub const BOOTSTRAP_ADMIN_EMAIL: &str = "admin@example.com";

/// The seeded admin and, when it was generated, its one-time password
#[derive(Debug)]
pub struct BootstrappedAdmin {
    pub user: user::Model,
    pub generated_password: Option<String>,
}

/// Create `admin` unless an active admin already exists
///
/// The password comes from `BOOTSTRAP_ADMIN_PASSWORD` when set, otherwise
/// it is generated and returned so the caller can show it once.
pub async fn ensure_admin(app_data: Arc<AppData>) -> Result<Option<BootstrappedAdmin>, InternalError> {
    if app_data.user_store.active_admin_exists(&app_data.db).await? {
        tracing::debug!("Active admin present, skipping bootstrap");
        return Ok(None);
    }

    let (password, generated) = match app_data.secret_manager.bootstrap_admin_password() {
        Some(password) => (password.to_string(), false),
        None => {
            let crypto = CryptoProvider::new(app_data.secret_manager.clone());
            (crypto.generate_secure_password(), true)
        }
    };

    let ctx = RequestContext::for_cli();
    let user = UserCoordinator::new(app_data)
        .create_user(
            &ctx,
            CreateUserInput {
                username: BOOTSTRAP_ADMIN_USERNAME.to_string(),
                email: BOOTSTRAP_ADMIN_EMAIL.to_string(),
                password: password.clone(),
                role: UserRole::Admin,
            },
        )
        .await?;

    tracing::info!(user_id = user.id, "Bootstrapped admin account '{}'", user.username);
    Ok(Some(BootstrappedAdmin {
        user,
        generated_password: generated.then_some(password),
    }))
}

/// Print the outcome of `ensure_admin` for the operator
pub fn report(admin: &Option<BootstrappedAdmin>) {
    let Some(admin) = admin else {
        println!("An active admin account already exists, nothing to do.");
        return;
    };

    println!("\n✓ Admin account created");
    println!("  Username: {}", admin.user.username);
    println!("  Email:    {}", admin.user.email);
    match &admin.generated_password {
        Some(password) => {
            println!("  Password: {}", password);
            println!("\n⚠️  This password is shown only once. Store it now.\n");
        }
        None => println!("  Password: from BOOTSTRAP_ADMIN_PASSWORD\n"),
    }
}

/// `bootstrap` command
pub async fn bootstrap_system(app_data: Arc<AppData>) -> Result<(), Box<dyn std::error::Error>> {
    let admin = ensure_admin(app_data).await?;
    report(&admin);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecretManager;
    use crate::test::utils::{insert_test_user, setup_test_db, TEST_PEPPER, TEST_SESSION_SECRET};
    use crate::config::ApplicationSettings;
    use tempfile::TempDir;

    async fn app_with_bootstrap_password(dir: &TempDir, password: Option<&str>) -> Arc<AppData> {
        let db = setup_test_db().await;
        let settings = ApplicationSettings::new("sqlite::memory:", dir.path());
        let secrets = SecretManager::from_values(TEST_SESSION_SECRET, TEST_PEPPER, password).unwrap();
        Arc::new(AppData::new(db, settings, secrets))
    }

    #[tokio::test]
    async fn test_generates_password_when_unset() {
        let dir = TempDir::new().unwrap();
        let app = app_with_bootstrap_password(&dir, None).await;

        let admin = ensure_admin(app.clone()).await.unwrap().unwrap();
        assert_eq!(admin.user.username, BOOTSTRAP_ADMIN_USERNAME);
        assert_eq!(admin.user.email, BOOTSTRAP_ADMIN_EMAIL);
        assert_eq!(admin.user.role, UserRole::Admin);
        assert_eq!(admin.generated_password.as_ref().map(|p| p.chars().count()), Some(20));

        assert!(ensure_admin(app).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_uses_configured_password() {
        let dir = TempDir::new().unwrap();
        let app = app_with_bootstrap_password(&dir, Some("configured-secret-1")).await;

        let admin = ensure_admin(app.clone()).await.unwrap().unwrap();
        assert!(admin.generated_password.is_none());

        let crypto = CryptoProvider::new(app.secret_manager.clone());
        assert!(crypto
            .verify_password(&admin.user.password_hash, "configured-secret-1")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_skips_when_admin_exists() {
        let dir = TempDir::new().unwrap();
        let app = app_with_bootstrap_password(&dir, None).await;
        insert_test_user(&app.db, "root", UserRole::Admin).await;

        assert!(ensure_admin(app.clone()).await.unwrap().is_none());
        assert!(app.user_store.find_by_username(&app.db, BOOTSTRAP_ADMIN_USERNAME).await.unwrap().is_none());
    }
}
