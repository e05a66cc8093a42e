use std::net::IpAddr;

use poem::Request;

use crate::errors::internal::AuthorizationError;
use crate::errors::InternalError;
use crate::types::internal::auth::Actor;

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through all layers
///
/// Carries what logging and authorization need about the current operation.
/// API requests start unauthenticated and gain an actor once the session
/// token resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub ip_address: Option<IpAddr>,

    pub request_id: RequestId,

    pub source: RequestSource,

    /// Authenticated user, if any
    pub actor: Option<Actor>,
}

impl RequestContext {
    pub fn for_cli() -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            source: RequestSource::CLI,
            actor: None,
        }
    }

    pub fn for_system() -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            source: RequestSource::System,
            actor: None,
        }
    }

    /// Unauthenticated context for an HTTP request
    pub fn from_request(req: &Request) -> Self {
        Self {
            ip_address: Self::extract_ip_address(req),
            request_id: RequestId::new(),
            source: RequestSource::API,
            actor: None,
        }
    }

    /// Checks X-Forwarded-For, then X-Real-IP, then the remote address
    fn extract_ip_address(req: &Request) -> Option<IpAddr> {
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.trim().parse().ok();
        }

        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }

    pub fn with_actor(mut self, actor: Actor) -> Self {
        self.actor = Some(actor);
        self
    }

    /// The authenticated actor, or `Unauthenticated`
    pub fn actor(&self) -> Result<&Actor, InternalError> {
        self.actor
            .as_ref()
            .ok_or_else(|| AuthorizationError::Unauthenticated.into())
    }

    /// Identifier used in log lines
    pub fn actor_label(&self) -> String {
        match (&self.actor, self.source) {
            (Some(actor), _) => format!("user:{}", actor.user_id),
            (None, RequestSource::CLI) => "cli".to_string(),
            (None, RequestSource::System) => "system".to_string(),
            (None, RequestSource::API) => "anonymous".to_string(),
        }
    }
}
