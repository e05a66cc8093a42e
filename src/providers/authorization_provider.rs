use std::fmt;

use crate::errors::internal::AuthorizationError;
use crate::errors::InternalError;
use crate::types::db::UserRole;
use crate::types::internal::Actor;

/// Everything an actor can attempt. Each variant has exactly one rule in
/// [`AuthorizationProvider::is_allowed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    UploadDocument,
    DeleteDocument,
    ViewDocuments,
    DownloadDocument,
    ViewDashboard,
    SubmitReview,
    ListUsers,
    ViewUser,
    CreateUser { role: UserRole },
    EditUser { target_user_id: i32 },
    ChangeRoleOrStatus { target_user_id: i32 },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::UploadDocument => write!(f, "upload documents"),
            Action::DeleteDocument => write!(f, "delete documents"),
            Action::ViewDocuments => write!(f, "view documents"),
            Action::DownloadDocument => write!(f, "download documents"),
            Action::ViewDashboard => write!(f, "view the dashboard"),
            Action::SubmitReview => write!(f, "submit reviews"),
            Action::ListUsers => write!(f, "list users"),
            Action::ViewUser => write!(f, "view users"),
            Action::CreateUser { role } => write!(f, "create {} accounts", role),
            Action::EditUser { target_user_id } => write!(f, "edit user {}", target_user_id),
            Action::ChangeRoleOrStatus { target_user_id } => {
                write!(f, "change role or status of user {}", target_user_id)
            }
        }
    }
}

pub struct AuthorizationProvider;

impl AuthorizationProvider {
    pub fn new() -> Self {
        Self
    }

    pub fn is_allowed(&self, actor: &Actor, action: Action) -> bool {
        let is_admin = actor.role == UserRole::Admin;
        match action {
            Action::UploadDocument | Action::DeleteDocument => is_admin,
            Action::ViewDocuments | Action::DownloadDocument | Action::ViewDashboard => true,
            Action::SubmitReview => actor.role == UserRole::Reviewer,
            Action::ListUsers | Action::ViewUser => true,
            Action::CreateUser { role } => is_admin || role == UserRole::Reviewer,
            Action::EditUser { target_user_id } => is_admin || actor.user_id == target_user_id,
            Action::ChangeRoleOrStatus { target_user_id } => is_admin && actor.user_id != target_user_id,
        }
    }

    /// Fails with `Forbidden`, or `SelfModificationDenied` when an admin
    /// targets their own role or status
    pub fn authorize(&self, actor: &Actor, action: Action) -> Result<(), InternalError> {
        if self.is_allowed(actor, action) {
            return Ok(());
        }

        tracing::warn!(
            user_id = actor.user_id,
            role = %actor.role,
            "Permission denied: {}",
            action
        );

        match action {
            Action::ChangeRoleOrStatus { target_user_id } if actor.is_admin() && actor.user_id == target_user_id => {
                Err(AuthorizationError::SelfModificationDenied.into())
            }
            _ => Err(AuthorizationError::forbidden(action.to_string()).into()),
        }
    }
}

impl Default for AuthorizationProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(user_id: i32, role: UserRole) -> Actor {
        Actor {
            user_id,
            username: format!("user{}", user_id),
            role,
            session_id: "sid".to_string(),
        }
    }

    #[test]
    fn test_document_actions() {
        let provider = AuthorizationProvider::new();
        let admin = actor(1, UserRole::Admin);
        let reviewer = actor(2, UserRole::Reviewer);

        assert!(provider.is_allowed(&admin, Action::UploadDocument));
        assert!(!provider.is_allowed(&reviewer, Action::UploadDocument));
        assert!(provider.is_allowed(&admin, Action::DeleteDocument));
        assert!(!provider.is_allowed(&reviewer, Action::DeleteDocument));

        for action in [Action::ViewDocuments, Action::DownloadDocument, Action::ViewDashboard] {
            assert!(provider.is_allowed(&admin, action));
            assert!(provider.is_allowed(&reviewer, action));
        }

        assert!(provider.is_allowed(&reviewer, Action::SubmitReview));
        assert!(!provider.is_allowed(&admin, Action::SubmitReview));
    }

    #[test]
    fn test_user_creation_rules() {
        let provider = AuthorizationProvider::new();
        let admin = actor(1, UserRole::Admin);
        let reviewer = actor(2, UserRole::Reviewer);

        assert!(provider.is_allowed(&admin, Action::CreateUser { role: UserRole::Admin }));
        assert!(provider.is_allowed(&admin, Action::CreateUser { role: UserRole::Reviewer }));
        assert!(provider.is_allowed(&reviewer, Action::CreateUser { role: UserRole::Reviewer }));
        assert!(!provider.is_allowed(&reviewer, Action::CreateUser { role: UserRole::Admin }));
    }

    #[test]
    fn test_edit_rules() {
        let provider = AuthorizationProvider::new();
        let admin = actor(1, UserRole::Admin);
        let reviewer = actor(2, UserRole::Reviewer);

        assert!(provider.is_allowed(&admin, Action::EditUser { target_user_id: 2 }));
        assert!(provider.is_allowed(&admin, Action::EditUser { target_user_id: 1 }));
        assert!(provider.is_allowed(&reviewer, Action::EditUser { target_user_id: 2 }));
        assert!(!provider.is_allowed(&reviewer, Action::EditUser { target_user_id: 3 }));

        assert!(provider.is_allowed(&admin, Action::ChangeRoleOrStatus { target_user_id: 2 }));
        assert!(!provider.is_allowed(&admin, Action::ChangeRoleOrStatus { target_user_id: 1 }));
        assert!(!provider.is_allowed(&reviewer, Action::ChangeRoleOrStatus { target_user_id: 2 }));
    }

    #[test]
    fn test_authorize_error_kinds() {
        let provider = AuthorizationProvider::new();
        let admin = actor(1, UserRole::Admin);
        let reviewer = actor(2, UserRole::Reviewer);

        assert!(matches!(
            provider.authorize(&admin, Action::ChangeRoleOrStatus { target_user_id: 1 }),
            Err(InternalError::Authorization(AuthorizationError::SelfModificationDenied))
        ));
        assert!(matches!(
            provider.authorize(&reviewer, Action::ChangeRoleOrStatus { target_user_id: 2 }),
            Err(InternalError::Authorization(AuthorizationError::Forbidden { .. }))
        ));
        assert!(matches!(
            provider.authorize(&reviewer, Action::CreateUser { role: UserRole::Admin }),
            Err(InternalError::Authorization(AuthorizationError::Forbidden { .. }))
        ));
        assert!(provider.authorize(&reviewer, Action::SubmitReview).is_ok());
    }
}
