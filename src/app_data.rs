use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::{init_database, migrate_database, ApplicationSettings, SecretManager};
use crate::errors::InternalError;
use crate::stores::{DocumentStore, ReviewStore, SessionStore, UserStore};

/// Shared application data, created once in main and handed to coordinators
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(settings, secrets)
///   ├─ db (DatabaseConnection, migrated)
///   ├─ settings / secret_manager (immutable, Arc)
///   └─ user / document / review / session stores
///   ↓ wrapped in Arc<AppData>
///   ↓ passed to coordinators, which build their providers
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub settings: Arc<ApplicationSettings>,
    pub secret_manager: Arc<SecretManager>,
    pub user_store: Arc<UserStore>,
    pub document_store: Arc<DocumentStore>,
    pub review_store: Arc<ReviewStore>,
    pub session_store: Arc<SessionStore>,
}

impl AppData {
    /// Connect, migrate and create the stores
    pub async fn init(settings: ApplicationSettings, secret_manager: SecretManager) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        let db = init_database(settings.database_url()).await?;
        migrate_database(&db).await?;

        let app_data = Self::new(db, settings, secret_manager);
        tracing::info!("AppData initialization complete");
        Ok(app_data)
    }

    /// Wrap an already migrated connection
    pub fn new(db: DatabaseConnection, settings: ApplicationSettings, secret_manager: SecretManager) -> Self {
        Self {
            db,
            settings: Arc::new(settings),
            secret_manager: Arc::new(secret_manager),
            user_store: Arc::new(UserStore::new()),
            document_store: Arc::new(DocumentStore::new()),
            review_store: Arc::new(ReviewStore::new()),
            session_store: Arc::new(SessionStore::new()),
        }
    }
}
