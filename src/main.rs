use std::sync::Arc;

use clap::Parser;
use poem::listener::TcpListener;
use poem::middleware::{SizeLimit, Tracing};
use poem::{EndpointExt, Server};

use docreview_backend::api::build_routes;
use docreview_backend::cli::{self, bootstrap, Cli, Commands};
use docreview_backend::config::{init_logging, ApplicationSettings, SecretManager};
use docreview_backend::providers::FileStorageProvider;
use docreview_backend::AppData;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    init_logging()?;

    let cli = Cli::parse();
    let settings = ApplicationSettings::from_env()?;

    let command = cli.command.unwrap_or(Commands::Serve);
    if let Commands::Migrate = command {
        return cli::migrate::run_migrations(&settings).await;
    }

    let secret_manager = SecretManager::init()?;
    let app_data = Arc::new(AppData::init(settings, secret_manager).await?);

    match command {
        Commands::Serve => serve(app_data).await,
        other => cli::execute_command(other, app_data).await,
    }
}

async fn serve(app_data: Arc<AppData>) -> Result<(), Box<dyn std::error::Error>> {
    let admin = bootstrap::ensure_admin(app_data.clone()).await?;
    if admin.is_some() {
        bootstrap::report(&admin);
    }

    FileStorageProvider::new(&app_data.settings).ensure_upload_dir().await?;

    let address = app_data.settings.server_address();
    let max_request_bytes = app_data.settings.max_request_bytes();
    tracing::debug!(
        upload_dir = %app_data.settings.upload_dir().display(),
        max_request_bytes,
        "Upload storage ready"
    );

    let app = build_routes(app_data, "/api")
        .with(SizeLimit::new(max_request_bytes))
        .with(Tracing);

    tracing::info!("Starting server on http://{}", address);
    tracing::info!("Swagger UI available at http://{}/swagger", address);

    Server::new(TcpListener::bind(address)).run(app).await?;
    Ok(())
}
