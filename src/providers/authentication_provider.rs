use std::sync::Arc;

use chrono::Utc;
use sea_orm::ConnectionTrait;

use crate::errors::internal::CredentialError;
use crate::errors::InternalError;
use crate::providers::{CryptoProvider, TokenProvider};
use crate::stores::{SessionStore, UserStore};
use crate::types::db::{session, user};
use crate::types::internal::Actor;

/// An opened session and the signed token that refers to it
#[derive(Debug)]
pub struct IssuedSession {
    pub token: String,
    pub session: session::Model,
}

/// Credentials and server-side sessions
pub struct AuthenticationProvider {
    user_store: Arc<UserStore>,
    session_store: Arc<SessionStore>,
    crypto_provider: Arc<CryptoProvider>,
    token_provider: Arc<TokenProvider>,
}

impl AuthenticationProvider {
    pub fn new(
        user_store: Arc<UserStore>,
        session_store: Arc<SessionStore>,
        crypto_provider: Arc<CryptoProvider>,
        token_provider: Arc<TokenProvider>,
    ) -> Self {
        Self {
            user_store,
            session_store,
            crypto_provider,
            token_provider,
        }
    }

    /// Unknown usernames and wrong passwords fail the same way. The disabled
    /// check runs only after the password matched.
    pub async fn verify_credentials(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
        password: &str,
    ) -> Result<user::Model, InternalError> {
        let Some(user) = self.user_store.find_by_username(conn, username.trim()).await? else {
            return Err(CredentialError::InvalidCredentials.into());
        };

        if !self.crypto_provider.verify_password(&user.password_hash, password).await? {
            return Err(CredentialError::InvalidCredentials.into());
        }

        if !user.is_active {
            return Err(CredentialError::AccountDisabled {
                username: user.username,
            }
            .into());
        }

        Ok(user)
    }

    pub async fn open_session(
        &self,
        conn: &impl ConnectionTrait,
        user: &user::Model,
        ttl_seconds: i64,
    ) -> Result<IssuedSession, InternalError> {
        let purged = self.session_store.delete_expired(conn).await?;
        if purged > 0 {
            tracing::debug!("Purged {} expired sessions", purged);
        }

        let session = self.session_store.create(conn, user.id, ttl_seconds).await?;
        let token = self.token_provider.issue_session_token(user, &session)?;
        Ok(IssuedSession { token, session })
    }

    /// Token → session row → active user. The returned actor carries the
    /// role stored on the user now, not the one in the token.
    pub async fn resolve_session(
        &self,
        conn: &impl ConnectionTrait,
        token: &str,
    ) -> Result<(Actor, session::Model), InternalError> {
        let claims = self.token_provider.validate_session_token(token)?;
        let user_id = TokenProvider::user_id(&claims)?;

        let session = self
            .session_store
            .find(conn, &claims.sid)
            .await?
            .ok_or_else(|| CredentialError::SessionNotFound {
                session_id: claims.sid.clone(),
            })?;

        if session.user_id != user_id {
            return Err(CredentialError::invalid_token("session does not belong to subject").into());
        }
        if session.expires_at <= Utc::now().timestamp() {
            return Err(CredentialError::ExpiredToken.into());
        }

        let user = self
            .user_store
            .find_by_id(conn, user_id)
            .await?
            .ok_or_else(|| CredentialError::SessionNotFound {
                session_id: claims.sid.clone(),
            })?;

        if !user.is_active {
            return Err(CredentialError::AccountDisabled {
                username: user.username,
            }
            .into());
        }

        let actor = Actor {
            user_id: user.id,
            username: user.username,
            role: user.role,
            session_id: session.id.clone(),
        };
        Ok((actor, session))
    }

    pub async fn close_session(&self, conn: &impl ConnectionTrait, session_id: &str) -> Result<(), InternalError> {
        if !self.session_store.delete(conn, session_id).await? {
            return Err(CredentialError::SessionNotFound {
                session_id: session_id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Drop every session of a user, returning how many were removed
    pub async fn revoke_user_sessions(&self, conn: &impl ConnectionTrait, user_id: i32) -> Result<u64, InternalError> {
        let revoked = self.session_store.delete_for_user(conn, user_id).await?;
        if revoked > 0 {
            tracing::info!(user_id, "Revoked {} sessions", revoked);
        }
        Ok(revoked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::UserChanges;
    use crate::test::utils::{insert_user_with_password, setup_test_db, test_secret_manager};
    use crate::types::db::UserRole;

    fn provider() -> AuthenticationProvider {
        let secrets = test_secret_manager();
        AuthenticationProvider::new(
            Arc::new(UserStore::new()),
            Arc::new(SessionStore::new()),
            Arc::new(CryptoProvider::new(secrets.clone())),
            Arc::new(TokenProvider::new(secrets)),
        )
    }

    #[tokio::test]
    async fn test_verify_credentials() {
        let db = setup_test_db().await;
        insert_user_with_password(&db, "rita", "reviewer-pass-1", UserRole::Reviewer).await;
        let auth = provider();

        let user = auth.verify_credentials(&db, "rita", "reviewer-pass-1").await.unwrap();
        assert_eq!(user.username, "rita");

        assert!(matches!(
            auth.verify_credentials(&db, "rita", "wrong-password").await,
            Err(InternalError::Credential(CredentialError::InvalidCredentials))
        ));
        assert!(matches!(
            auth.verify_credentials(&db, "nobody", "reviewer-pass-1").await,
            Err(InternalError::Credential(CredentialError::InvalidCredentials))
        ));
    }

    #[tokio::test]
    async fn test_disabled_user_cannot_authenticate() {
        let db = setup_test_db().await;
        let user = insert_user_with_password(&db, "rita", "reviewer-pass-1", UserRole::Reviewer).await;
        UserStore::new()
            .update(&db, user, UserChanges { is_active: Some(false), ..Default::default() })
            .await
            .unwrap();

        assert!(matches!(
            provider().verify_credentials(&db, "rita", "reviewer-pass-1").await,
            Err(InternalError::Credential(CredentialError::AccountDisabled { .. }))
        ));
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let db = setup_test_db().await;
        let user = insert_user_with_password(&db, "rita", "reviewer-pass-1", UserRole::Reviewer).await;
        let auth = provider();

        let issued = auth.open_session(&db, &user, 3600).await.unwrap();
        let (actor, session) = auth.resolve_session(&db, &issued.token).await.unwrap();
        assert_eq!(actor.user_id, user.id);
        assert_eq!(actor.role, UserRole::Reviewer);
        assert_eq!(session.id, issued.session.id);

        auth.close_session(&db, &session.id).await.unwrap();
        assert!(matches!(
            auth.resolve_session(&db, &issued.token).await,
            Err(InternalError::Credential(CredentialError::SessionNotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_role_comes_from_database() {
        let db = setup_test_db().await;
        let user = insert_user_with_password(&db, "rita", "reviewer-pass-1", UserRole::Reviewer).await;
        let auth = provider();
        let issued = auth.open_session(&db, &user, 3600).await.unwrap();

        UserStore::new()
            .update(&db, user, UserChanges { role: Some(UserRole::Admin), ..Default::default() })
            .await
            .unwrap();

        let (actor, _) = auth.resolve_session(&db, &issued.token).await.unwrap();
        assert_eq!(actor.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_disabling_user_invalidates_existing_session() {
        let db = setup_test_db().await;
        let user = insert_user_with_password(&db, "rita", "reviewer-pass-1", UserRole::Reviewer).await;
        let auth = provider();
        let issued = auth.open_session(&db, &user, 3600).await.unwrap();

        UserStore::new()
            .update(&db, user, UserChanges { is_active: Some(false), ..Default::default() })
            .await
            .unwrap();

        assert!(matches!(
            auth.resolve_session(&db, &issued.token).await,
            Err(InternalError::Credential(CredentialError::AccountDisabled { .. }))
        ));
    }

    #[tokio::test]
    async fn test_revoke_user_sessions() {
        let db = setup_test_db().await;
        let user = insert_user_with_password(&db, "rita", "reviewer-pass-1", UserRole::Reviewer).await;
        let auth = provider();
        let first = auth.open_session(&db, &user, 3600).await.unwrap();
        let second = auth.open_session(&db, &user, 3600).await.unwrap();

        assert_eq!(auth.revoke_user_sessions(&db, user.id).await.unwrap(), 2);
        assert!(auth.resolve_session(&db, &first.token).await.is_err());
        assert!(auth.resolve_session(&db, &second.token).await.is_err());
    }
}
