use std::sync::Arc;

use crate::app_data::AppData;
use crate::config::{begin_transaction, commit_transaction, ApplicationSettings};
use crate::errors::internal::CredentialError;
use crate::errors::InternalError;
use crate::providers::{AuthenticationProvider, CryptoProvider, IssuedSession, TokenProvider};
use crate::stores::{SessionStore, UserStore};
use crate::types::db::user;
use crate::types::internal::context::RequestContext;

/// Orchestrates login, logout, whoami and per-request session resolution
pub struct AuthCoordinator {
    app_data: Arc<AppData>,
    settings: Arc<ApplicationSettings>,
    user_store: Arc<UserStore>,
    session_store: Arc<SessionStore>,
    authentication_provider: Arc<AuthenticationProvider>,
}

impl AuthCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        let crypto_provider = Arc::new(CryptoProvider::new(app_data.secret_manager.clone()));
        let token_provider = Arc::new(TokenProvider::new(app_data.secret_manager.clone()));
        let authentication_provider = Arc::new(AuthenticationProvider::new(
            app_data.user_store.clone(),
            app_data.session_store.clone(),
            crypto_provider,
            token_provider,
        ));

        Self {
            settings: app_data.settings.clone(),
            user_store: app_data.user_store.clone(),
            session_store: app_data.session_store.clone(),
            authentication_provider,
            app_data,
        }
    }

    /// Verify credentials and open a session
    pub async fn login(
        &self,
        ctx: &RequestContext,
        username: &str,
        password: &str,
    ) -> Result<(IssuedSession, user::Model), InternalError> {
        let user = match self
            .authentication_provider
            .verify_credentials(&self.app_data.db, username, password)
            .await
        {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(
                    request_id = %ctx.request_id,
                    ip = ?ctx.ip_address,
                    "Login rejected for '{}': {}",
                    username,
                    e
                );
                return Err(e);
            }
        };

        let txn = begin_transaction(&self.app_data.db).await?;
        let issued = self
            .authentication_provider
            .open_session(&txn, &user, self.settings.session_ttl_seconds())
            .await?;
        commit_transaction(txn).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            user_id = user.id,
            "User '{}' logged in",
            user.username
        );
        Ok((issued, user))
    }

    /// Resolve a bearer token into an authenticated context
    pub async fn authenticate(&self, ctx: RequestContext, token: &str) -> Result<RequestContext, InternalError> {
        let (actor, _session) = self
            .authentication_provider
            .resolve_session(&self.app_data.db, token)
            .await
            .inspect_err(|e| {
                tracing::debug!(request_id = %ctx.request_id, "Session rejected: {}", e);
            })?;

        Ok(ctx.with_actor(actor))
    }

    pub async fn logout(&self, ctx: &RequestContext) -> Result<(), InternalError> {
        let actor = ctx.actor()?;
        self.authentication_provider
            .close_session(&self.app_data.db, &actor.session_id)
            .await?;

        tracing::info!(request_id = %ctx.request_id, user_id = actor.user_id, "User logged out");
        Ok(())
    }

    /// The caller's account and the expiry of the current session
    pub async fn whoami(&self, ctx: &RequestContext) -> Result<(user::Model, i64), InternalError> {
        let actor = ctx.actor()?;
        let user = self.user_store.get_by_id(&self.app_data.db, actor.user_id).await?;
        let session = self
            .session_store
            .find(&self.app_data.db, &actor.session_id)
            .await?
            .ok_or_else(|| CredentialError::SessionNotFound {
                session_id: actor.session_id.clone(),
            })?;

        Ok((user, session.expires_at))
    }
}
