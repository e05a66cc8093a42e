use tempfile::TempDir;

use crate::coordinators::{DocumentCoordinator, ReviewCoordinator, ReviewOutcome, UploadInput};
use crate::errors::internal::{AuthorizationError, DocumentError, ReviewError, ValidationError};
use crate::errors::InternalError;
use crate::test::utils::{context_for, insert_test_user, setup_test_app};
use crate::types::db::{DocumentStatus, UserRole};
use crate::types::dto::ReviewState;

async fn uploaded_document(app: &std::sync::Arc<crate::app_data::AppData>) -> i32 {
    let admin = insert_test_user(&app.db, "admin", UserRole::Admin).await;
    DocumentCoordinator::new(app.clone())
        .upload(
            &context_for(&admin),
            UploadInput {
                title: Some("Spec".to_string()),
                description: None,
                file_name: Some("spec.pdf".to_string()),
                data: vec![0u8; 2 * 1024 * 1024],
            },
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_review_created_then_updated_in_place() {
    let dir = TempDir::new().unwrap();
    let app = setup_test_app(dir.path()).await;
    let document_id = uploaded_document(&app).await;
    let reviewer = insert_test_user(&app.db, "rita", UserRole::Reviewer).await;
    let coordinator = ReviewCoordinator::new(app.clone());
    let ctx = context_for(&reviewer);

    let (created, outcome) = coordinator
        .submit_review(&ctx, document_id, 85, Some("ok".to_string()))
        .await
        .unwrap();
    assert_eq!(outcome, ReviewOutcome::Created);
    assert_eq!(created.score, 85);
    assert_eq!(created.comment, Some("ok".to_string()));
    assert_eq!(created.status, ReviewState::Completed);

    let document = app.document_store.get_by_id(&app.db, document_id).await.unwrap();
    assert_eq!(document.status, DocumentStatus::Reviewed);
    let reviewed_at = document.updated_at;

    let (updated, outcome) = coordinator.submit_review(&ctx, document_id, 90, None).await.unwrap();
    assert_eq!(outcome, ReviewOutcome::Updated);
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.score, 90);

    let all = app.review_store.list_for_document(&app.db, document_id).await.unwrap();
    assert_eq!(all.len(), 1);

    let document = app.document_store.get_by_id(&app.db, document_id).await.unwrap();
    assert_eq!(document.status, DocumentStatus::Reviewed);
    assert_eq!(document.updated_at, reviewed_at);
}

#[tokio::test]
async fn test_score_bounds_checked_before_mutation() {
    let dir = TempDir::new().unwrap();
    let app = setup_test_app(dir.path()).await;
    let document_id = uploaded_document(&app).await;
    let reviewer = insert_test_user(&app.db, "rita", UserRole::Reviewer).await;
    let coordinator = ReviewCoordinator::new(app.clone());
    let ctx = context_for(&reviewer);

    for score in [-1, 101] {
        let result = coordinator.submit_review(&ctx, document_id, score, None).await;
        assert!(matches!(
            result,
            Err(InternalError::Validation(ValidationError::ScoreOutOfRange { .. }))
        ));
    }
    let document = app.document_store.get_by_id(&app.db, document_id).await.unwrap();
    assert_eq!(document.status, DocumentStatus::Pending);
    assert!(app
        .review_store
        .find_for_reviewer(&app.db, document_id, reviewer.id)
        .await
        .unwrap()
        .is_none());

    let (review, _) = coordinator.submit_review(&ctx, document_id, 0, None).await.unwrap();
    assert_eq!(review.score, 0);
    let (review, _) = coordinator.submit_review(&ctx, document_id, 100, None).await.unwrap();
    assert_eq!(review.score, 100);
}

#[tokio::test]
async fn test_admin_cannot_review() {
    let dir = TempDir::new().unwrap();
    let app = setup_test_app(dir.path()).await;
    let document_id = uploaded_document(&app).await;
    let other_admin = insert_test_user(&app.db, "admin2", UserRole::Admin).await;

    let result = ReviewCoordinator::new(app)
        .submit_review(&context_for(&other_admin), document_id, 50, None)
        .await;
    assert!(matches!(
        result,
        Err(InternalError::Authorization(AuthorizationError::Forbidden { .. }))
    ));
}

#[tokio::test]
async fn test_missing_document_and_review() {
    let dir = TempDir::new().unwrap();
    let app = setup_test_app(dir.path()).await;
    let document_id = uploaded_document(&app).await;
    let reviewer = insert_test_user(&app.db, "rita", UserRole::Reviewer).await;
    let coordinator = ReviewCoordinator::new(app);
    let ctx = context_for(&reviewer);

    assert!(matches!(
        coordinator.submit_review(&ctx, 4242, 50, None).await,
        Err(InternalError::Document(DocumentError::NotFound { document_id: 4242 }))
    ));
    assert!(matches!(
        coordinator.my_review(&ctx, document_id).await,
        Err(InternalError::Review(ReviewError::NotFound { .. }))
    ));

    coordinator.submit_review(&ctx, document_id, 64, Some("  ".to_string())).await.unwrap();
    let mine = coordinator.my_review(&ctx, document_id).await.unwrap();
    assert_eq!(mine.score, 64);
    assert_eq!(mine.comment, None);
}
