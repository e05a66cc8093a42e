// API layer - HTTP endpoints
//
// Each endpoint builds a RequestContext, resolves the session through
// helpers::authenticate and hands off to a coordinator. Errors become
// ApiError / AuthError at this boundary.

pub mod auth;
pub mod dashboard;
pub mod documents;
pub mod health;
pub mod helpers;
pub mod reviews;
pub mod users;

use std::sync::Arc;

use poem::Route;
use poem_openapi::OpenApiService;

pub use auth::{AuthApi, SessionAuth};
pub use dashboard::DashboardApi;
pub use documents::DocumentApi;
pub use health::HealthApi;
pub use reviews::ReviewApi;
pub use users::UserApi;

use crate::app_data::AppData;
use crate::coordinators::{AuthCoordinator, DocumentCoordinator, ReviewCoordinator, UserCoordinator};

pub type ApiService = OpenApiService<(HealthApi, AuthApi, DashboardApi, DocumentApi, ReviewApi, UserApi), ()>;

/// Wire coordinators into the endpoint groups
pub fn api_service(app_data: Arc<AppData>, server_url: &str) -> ApiService {
    let auth_coordinator = Arc::new(AuthCoordinator::new(app_data.clone()));
    let document_coordinator = Arc::new(DocumentCoordinator::new(app_data.clone()));
    let review_coordinator = Arc::new(ReviewCoordinator::new(app_data.clone()));
    let user_coordinator = Arc::new(UserCoordinator::new(app_data));

    let apis = (
        HealthApi,
        AuthApi::new(auth_coordinator.clone()),
        DashboardApi::new(auth_coordinator.clone(), document_coordinator.clone()),
        DocumentApi::new(auth_coordinator.clone(), document_coordinator),
        ReviewApi::new(auth_coordinator.clone(), review_coordinator),
        UserApi::new(auth_coordinator, user_coordinator),
    );

    OpenApiService::new(apis, "Document Review API", env!("CARGO_PKG_VERSION")).server(server_url)
}

/// `/api` plus Swagger UI at `/swagger`
pub fn build_routes(app_data: Arc<AppData>, server_url: &str) -> Route {
    let service = api_service(app_data, server_url);
    let ui = service.swagger_ui();

    Route::new().nest("/api", service).nest("/swagger", ui)
}

#[cfg(test)]
mod helpers_test;
