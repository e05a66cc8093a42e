mod common;

use std::sync::Arc;

use docreview_backend::config::{ApplicationSettings, SecretError, SecretManager};
use docreview_backend::providers::TokenProvider;
use docreview_backend::types::db::{session, user, UserRole};

const SECRET_VARS: [&str; 3] = ["SESSION_SECRET", "PASSWORD_PEPPER", "BOOTSTRAP_ADMIN_PASSWORD"];

#[test]
fn test_application_startup_with_valid_secrets() {
    let _lock = common::ENV_TEST_MUTEX.lock().unwrap();
    let _guard = common::EnvGuard::new(SECRET_VARS.to_vec());

    unsafe {
        std::env::set_var("SESSION_SECRET", "this-is-a-valid-session-secret-32-chars");
        std::env::set_var("PASSWORD_PEPPER", "valid-pepper-16ch");
    }

    let secret_manager = Arc::new(SecretManager::init().expect("valid secrets"));
    assert_eq!(secret_manager.session_secret(), "this-is-a-valid-session-secret-32-chars");
    assert_eq!(secret_manager.password_pepper(), "valid-pepper-16ch");
    assert!(secret_manager.bootstrap_admin_password().is_none());

    let debug = format!("{:?}", secret_manager);
    assert!(!debug.contains("this-is-a-valid-session-secret-32-chars"));
}

#[test]
fn test_application_fails_with_missing_session_secret() {
    let _lock = common::ENV_TEST_MUTEX.lock().unwrap();
    let _guard = common::EnvGuard::new(SECRET_VARS.to_vec());

    unsafe {
        std::env::set_var("PASSWORD_PEPPER", "valid-pepper-16ch");
    }

    match SecretManager::init() {
        Err(SecretError::Missing { secret_name }) => assert_eq!(secret_name, "SESSION_SECRET"),
        other => panic!("Expected Missing error for SESSION_SECRET, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_application_fails_with_short_pepper() {
    let _lock = common::ENV_TEST_MUTEX.lock().unwrap();
    let _guard = common::EnvGuard::new(SECRET_VARS.to_vec());

    unsafe {
        std::env::set_var("SESSION_SECRET", "this-is-a-valid-session-secret-32-chars");
        std::env::set_var("PASSWORD_PEPPER", "short");
    }

    match SecretManager::init() {
        Err(SecretError::InvalidLength { secret_name, .. }) => assert_eq!(secret_name, "PASSWORD_PEPPER"),
        other => panic!("Expected InvalidLength for PASSWORD_PEPPER, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_settings_read_from_environment() {
    let _lock = common::ENV_TEST_MUTEX.lock().unwrap();
    let _guard = common::EnvGuard::new(vec!["PORT", "MAX_UPLOAD_BYTES", "ALLOWED_EXTENSIONS", "SESSION_TTL_HOURS"]);

    unsafe {
        std::env::set_var("PORT", "8080");
        std::env::set_var("MAX_UPLOAD_BYTES", "1024");
        std::env::set_var("ALLOWED_EXTENSIONS", "PDF, .md");
        std::env::set_var("SESSION_TTL_HOURS", "2");
    }

    let settings = ApplicationSettings::from_env().expect("valid settings");
    assert_eq!(settings.server_port(), 8080);
    assert_eq!(settings.max_upload_bytes(), 1024);
    assert_eq!(settings.allowed_extensions(), ["pdf".to_string(), "md".to_string()]);
    assert_eq!(settings.session_ttl_seconds(), 7200);

    unsafe {
        std::env::set_var("PORT", "not-a-port");
    }
    assert!(ApplicationSettings::from_env().is_err());
}

#[test]
fn test_tokens_signed_with_other_secret_are_rejected() {
    let issuer = TokenProvider::new(Arc::new(
        SecretManager::from_values("first-session-secret-that-is-32-chars!", common::TEST_PEPPER, None).unwrap(),
    ));
    let verifier = TokenProvider::new(Arc::new(
        SecretManager::from_values("second-session-secret-that-is-32-chars", common::TEST_PEPPER, None).unwrap(),
    ));

    let now = chrono::Utc::now().timestamp();
    let user = user::Model {
        id: 1,
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
        password_hash: String::new(),
        role: UserRole::Reviewer,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    let session = session::Model {
        id: "session-1".to_string(),
        user_id: 1,
        created_at: now,
        expires_at: now + 60,
    };

    let token = issuer.issue_session_token(&user, &session).unwrap();
    assert!(issuer.validate_session_token(&token).is_ok());
    assert!(verifier.validate_session_token(&token).is_err());
}
