use crate::config::{init_database, migrate_database, ApplicationSettings};

/// `migrate` command: connect and apply pending migrations without
/// building the rest of the application
pub async fn run_migrations(settings: &ApplicationSettings) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");

    let db = init_database(settings.database_url()).await?;
    migrate_database(&db).await?;

    tracing::info!("All migrations completed successfully");
    println!("Migrations applied to {}", settings.database_url());
    Ok(())
}
