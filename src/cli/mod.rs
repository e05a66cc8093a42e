// CLI module for administrative operations requiring server access

pub mod bootstrap;
pub mod migrate;
pub mod users;

use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};

use crate::app_data::AppData;
use crate::types::db::UserRole;

/// Document review backend
#[derive(Parser)]
#[command(name = "docreview")]
#[command(about = "Document review backend server and administration CLI", long_about = None)]
pub struct Cli {
    /// Defaults to `serve`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run migrations, seed the admin if needed and start the HTTP server
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Create the initial admin account if no active admin exists
    Bootstrap,

    /// Create an account from the command line
    CreateUser {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long, value_enum, default_value_t = CliRole::Reviewer)]
        role: CliRole,

        /// Generated and printed when omitted
        #[arg(long)]
        password: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CliRole {
    Admin,
    Reviewer,
}

impl From<CliRole> for UserRole {
    fn from(role: CliRole) -> Self {
        match role {
            CliRole::Admin => UserRole::Admin,
            CliRole::Reviewer => UserRole::Reviewer,
        }
    }
}

/// Run an administrative command against an initialized AppData
///
/// `serve` and `migrate` are handled by main before AppData exists.
pub async fn execute_command(command: Commands, app_data: Arc<AppData>) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Serve | Commands::Migrate => {}
        Commands::Bootstrap => {
            bootstrap::bootstrap_system(app_data).await?;
        }
        Commands::CreateUser {
            username,
            email,
            role,
            password,
        } => {
            users::create_user(app_data, username, email, role.into(), password).await?;
        }
    }

    Ok(())
}
