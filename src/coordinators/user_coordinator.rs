use std::sync::Arc;

use crate::app_data::AppData;
use crate::config::{begin_transaction, commit_transaction};
use crate::errors::internal::{AuthorizationError, UserError};
use crate::errors::InternalError;
use crate::providers::{
    Action, AuthenticationProvider, AuthorizationProvider, CryptoProvider, InputValidatorProvider,
    PasswordValidatorProvider, TokenProvider,
};
use crate::stores::{NewUser, UserChanges, UserStore};
use crate::types::db::{user, UserRole};
use crate::types::internal::context::{RequestContext, RequestSource};

/// Input for a new account
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// Requested changes. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

/// Orchestrates account creation, listing, editing and disabling
pub struct UserCoordinator {
    app_data: Arc<AppData>,
    user_store: Arc<UserStore>,
    crypto_provider: Arc<CryptoProvider>,
    authentication_provider: Arc<AuthenticationProvider>,
    authorization_provider: AuthorizationProvider,
    input_validator: InputValidatorProvider,
    password_validator: PasswordValidatorProvider,
}

impl UserCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        let crypto_provider = Arc::new(CryptoProvider::new(app_data.secret_manager.clone()));
        let authentication_provider = Arc::new(AuthenticationProvider::new(
            app_data.user_store.clone(),
            app_data.session_store.clone(),
            crypto_provider.clone(),
            Arc::new(TokenProvider::new(app_data.secret_manager.clone())),
        ));

        Self {
            user_store: app_data.user_store.clone(),
            crypto_provider,
            authentication_provider,
            authorization_provider: AuthorizationProvider::new(),
            input_validator: InputValidatorProvider::new(),
            password_validator: PasswordValidatorProvider::new(),
            app_data,
        }
    }

    /// API requests need an actor allowed to perform `action`; CLI and
    /// system operations run with operator authority.
    fn authorize(&self, ctx: &RequestContext, action: Action) -> Result<(), InternalError> {
        match (&ctx.actor, ctx.source) {
            (Some(actor), _) => self.authorization_provider.authorize(actor, action),
            (None, RequestSource::CLI | RequestSource::System) => Ok(()),
            (None, RequestSource::API) => Err(AuthorizationError::Unauthenticated.into()),
        }
    }

    pub async fn create_user(&self, ctx: &RequestContext, input: CreateUserInput) -> Result<user::Model, InternalError> {
        self.authorize(ctx, Action::CreateUser { role: input.role })?;

        let username = self.input_validator.username(&input.username)?;
        let email = self.input_validator.email(&input.email)?;
        self.password_validator.validate(&input.password, Some(&username))?;

        if self.user_store.find_by_username(&self.app_data.db, &username).await?.is_some() {
            return Err(UserError::DuplicateUsername { username }.into());
        }
        if self.user_store.find_by_email(&self.app_data.db, &email).await?.is_some() {
            return Err(UserError::DuplicateEmail { email }.into());
        }

        let password_hash = self.crypto_provider.hash_password(&input.password).await?;

        let txn = begin_transaction(&self.app_data.db).await?;
        let created = self
            .user_store
            .create(
                &txn,
                NewUser {
                    username,
                    email,
                    password_hash,
                    role: input.role,
                },
            )
            .await?;
        commit_transaction(txn).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %ctx.actor_label(),
            user_id = created.id,
            "Created {} account '{}'",
            created.role,
            created.username
        );
        Ok(created)
    }

    pub async fn list_users(&self, ctx: &RequestContext) -> Result<Vec<user::Model>, InternalError> {
        self.authorize(ctx, Action::ListUsers)?;
        self.user_store.list(&self.app_data.db).await
    }

    pub async fn get_user(&self, ctx: &RequestContext, user_id: i32) -> Result<user::Model, InternalError> {
        self.authorize(ctx, Action::ViewUser)?;
        self.user_store.get_by_id(&self.app_data.db, user_id).await
    }

    /// Email and password are editable by the owner or an admin; role and
    /// active flag only by an admin on another account. Unchanged values
    /// do not count as changes.
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: i32,
        input: UpdateUserInput,
    ) -> Result<user::Model, InternalError> {
        self.authorize(ctx, Action::EditUser { target_user_id: user_id })?;

        let target = self.user_store.get_by_id(&self.app_data.db, user_id).await?;

        let role = input.role.filter(|role| *role != target.role);
        let is_active = input.is_active.filter(|active| *active != target.is_active);
        if role.is_some() || is_active.is_some() {
            self.authorize(ctx, Action::ChangeRoleOrStatus { target_user_id: user_id })?;
        }

        let email = match input.email {
            Some(email) => Some(self.input_validator.email(&email)?).filter(|e| *e != target.email),
            None => None,
        };
        if let Some(email) = &email {
            if let Some(existing) = self.user_store.find_by_email(&self.app_data.db, email).await? {
                if existing.id != target.id {
                    return Err(UserError::DuplicateEmail { email: email.clone() }.into());
                }
            }
        }

        let password_hash = match &input.password {
            Some(password) => {
                self.password_validator.validate(password, Some(&target.username))?;
                Some(self.crypto_provider.hash_password(password).await?)
            }
            None => None,
        };

        let revoke_sessions = password_hash.is_some() || is_active == Some(false);
        let changes = UserChanges {
            email,
            password_hash,
            role,
            is_active,
        };

        let txn = begin_transaction(&self.app_data.db).await?;
        let updated = self.user_store.update(&txn, target, changes).await?;
        if revoke_sessions {
            self.authentication_provider.revoke_user_sessions(&txn, updated.id).await?;
        }
        commit_transaction(txn).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %ctx.actor_label(),
            user_id = updated.id,
            "Updated account '{}'",
            updated.username
        );
        Ok(updated)
    }

    /// Deactivate an account and end its sessions
    pub async fn disable_user(&self, ctx: &RequestContext, user_id: i32) -> Result<user::Model, InternalError> {
        self.authorize(ctx, Action::ChangeRoleOrStatus { target_user_id: user_id })?;

        let txn = begin_transaction(&self.app_data.db).await?;
        let target = self.user_store.get_by_id(&txn, user_id).await?;
        let updated = self
            .user_store
            .update(
                &txn,
                target,
                UserChanges {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await?;
        self.authentication_provider.revoke_user_sessions(&txn, updated.id).await?;
        commit_transaction(txn).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %ctx.actor_label(),
            user_id = updated.id,
            "Disabled account '{}'",
            updated.username
        );
        Ok(updated)
    }
}
