use poem::Request;

use crate::api::auth::SessionAuth;
use crate::coordinators::AuthCoordinator;
use crate::errors::InternalError;
use crate::types::internal::context::RequestContext;

/// Build the request context and resolve the bearer token into an actor
///
/// Every endpoint except health and login goes through here, so a token
/// whose session row is gone, expired or belongs to a disabled account is
/// rejected before any coordinator runs.
pub async fn authenticate(
    req: &Request,
    auth: &SessionAuth,
    auth_coordinator: &AuthCoordinator,
) -> Result<RequestContext, InternalError> {
    let ctx = RequestContext::from_request(req);
    auth_coordinator.authenticate(ctx, &auth.0.token).await
}
