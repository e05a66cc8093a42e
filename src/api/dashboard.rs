use std::sync::Arc;

use poem::Request;
use poem_openapi::payload::Json;
use poem_openapi::{OpenApi, Tags};

use crate::api::auth::SessionAuth;
use crate::api::helpers;
use crate::coordinators::{AuthCoordinator, DocumentCoordinator};
use crate::errors::ApiError;
use crate::types::dto::DashboardResponse;

pub struct DashboardApi {
    auth_coordinator: Arc<AuthCoordinator>,
    document_coordinator: Arc<DocumentCoordinator>,
}

impl DashboardApi {
    pub fn new(auth_coordinator: Arc<AuthCoordinator>, document_coordinator: Arc<DocumentCoordinator>) -> Self {
        Self {
            auth_coordinator,
            document_coordinator,
        }
    }
}

#[derive(Tags)]
enum DashboardTags {
    Dashboard,
}

#[OpenApi]
impl DashboardApi {
    /// Totals and all documents for admins; to-review and reviewed lists for reviewers
    #[oai(path = "/dashboard", method = "get", tag = "DashboardTags::Dashboard")]
    async fn dashboard(&self, req: &Request, auth: SessionAuth) -> Result<Json<DashboardResponse>, ApiError> {
        let ctx = helpers::authenticate(req, &auth, &self.auth_coordinator).await?;
        Ok(Json(self.document_coordinator.dashboard(&ctx).await?))
    }
}
