use poem::Request;
use poem_openapi::auth::Bearer;
use tempfile::TempDir;

use crate::api::auth::SessionAuth;
use crate::api::helpers::authenticate;
use crate::coordinators::{AuthCoordinator, UpdateUserInput, UserCoordinator};
use crate::errors::internal::CredentialError;
use crate::errors::InternalError;
use crate::test::utils::{context_for, insert_test_user, insert_user_with_password, setup_test_app};
use crate::types::db::UserRole;
use crate::types::internal::context::{RequestContext, RequestSource};

fn bearer(token: &str) -> SessionAuth {
    SessionAuth(Bearer {
        token: token.to_string(),
    })
}

#[tokio::test]
async fn test_authenticate_with_valid_session() {
    let dir = TempDir::new().unwrap();
    let app = setup_test_app(dir.path()).await;
    let user = insert_user_with_password(&app.db, "rita", "review-pass-1", UserRole::Reviewer).await;
    let coordinator = AuthCoordinator::new(app.clone());

    let req = Request::builder().header("X-Forwarded-For", "192.168.1.1, 10.0.0.1").finish();
    let (issued, _) = coordinator
        .login(&RequestContext::from_request(&req), "rita", "review-pass-1")
        .await
        .unwrap();

    let ctx = authenticate(&req, &bearer(&issued.token), &coordinator).await.unwrap();
    assert_eq!(ctx.source, RequestSource::API);
    assert_eq!(ctx.ip_address.map(|ip| ip.to_string()), Some("192.168.1.1".to_string()));
    let actor = ctx.actor().unwrap();
    assert_eq!(actor.user_id, user.id);
    assert_eq!(actor.session_id, issued.session.id);
}

#[tokio::test]
async fn test_authenticate_with_invalid_token() {
    let dir = TempDir::new().unwrap();
    let app = setup_test_app(dir.path()).await;
    let coordinator = AuthCoordinator::new(app);

    let req = Request::builder().finish();
    let result = authenticate(&req, &bearer("invalid-jwt-token"), &coordinator).await;
    assert!(matches!(
        result,
        Err(InternalError::Credential(CredentialError::InvalidToken { .. }))
    ));
}

#[tokio::test]
async fn test_session_stops_resolving_after_disable() {
    let dir = TempDir::new().unwrap();
    let app = setup_test_app(dir.path()).await;
    let admin = insert_test_user(&app.db, "admin", UserRole::Admin).await;
    let rita = insert_user_with_password(&app.db, "rita", "review-pass-1", UserRole::Reviewer).await;
    let auth = AuthCoordinator::new(app.clone());
    let users = UserCoordinator::new(app.clone());

    let req = Request::builder().finish();
    let (issued, _) = auth
        .login(&RequestContext::from_request(&req), "rita", "review-pass-1")
        .await
        .unwrap();
    assert!(authenticate(&req, &bearer(&issued.token), &auth).await.is_ok());

    users
        .update_user(
            &context_for(&admin),
            rita.id,
            UpdateUserInput {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(authenticate(&req, &bearer(&issued.token), &auth).await.is_err());
    let relogin = auth
        .login(&RequestContext::from_request(&req), "rita", "review-pass-1")
        .await;
    assert!(matches!(
        relogin,
        Err(InternalError::Credential(CredentialError::AccountDisabled { .. }))
    ));
}

#[tokio::test]
async fn test_role_comes_from_database_not_token() {
    let dir = TempDir::new().unwrap();
    let app = setup_test_app(dir.path()).await;
    let admin = insert_test_user(&app.db, "admin", UserRole::Admin).await;
    let rita = insert_user_with_password(&app.db, "rita", "review-pass-1", UserRole::Reviewer).await;
    let auth = AuthCoordinator::new(app.clone());

    let req = Request::builder().finish();
    let (issued, _) = auth
        .login(&RequestContext::from_request(&req), "rita", "review-pass-1")
        .await
        .unwrap();

    UserCoordinator::new(app.clone())
        .update_user(
            &context_for(&admin),
            rita.id,
            UpdateUserInput {
                role: Some(UserRole::Admin),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let ctx = authenticate(&req, &bearer(&issued.token), &auth).await.unwrap();
    assert!(ctx.actor().unwrap().is_admin());
}
