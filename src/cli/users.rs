// create-user command implementation

use std::sync::Arc;

use crate::app_data::AppData;
use crate::coordinators::{CreateUserInput, UserCoordinator};
use crate::providers::CryptoProvider;
use crate::types::db::UserRole;
use crate::types::internal::context::RequestContext;

/// Create an account with operator authority, printing a generated
/// password when none was given
pub async fn create_user(
    app_data: Arc<AppData>,
    username: String,
    email: String,
    role: UserRole,
    password: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (password, generated) = match password {
        Some(password) => (password, false),
        None => (CryptoProvider::new(app_data.secret_manager.clone()).generate_secure_password(), true),
    };

    let ctx = RequestContext::for_cli();
    let user = UserCoordinator::new(app_data)
        .create_user(
            &ctx,
            CreateUserInput {
                username,
                email,
                password: password.clone(),
                role,
            },
        )
        .await?;

    println!("\n✓ {} account created", user.role);
    println!("  Username: {}", user.username);
    println!("  Email:    {}", user.email);
    if generated {
        println!("  Password: {}", password);
        println!("\n⚠️  This password is shown only once. Store it now.\n");
    }

    Ok(())
}
