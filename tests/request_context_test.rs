use docreview_backend::types::db::UserRole;
use docreview_backend::types::internal::context::{RequestContext, RequestSource};
use docreview_backend::types::internal::Actor;
use poem::Request;

#[test]
fn test_request_context_for_cli() {
    let ctx = RequestContext::for_cli();

    assert_eq!(ctx.source, RequestSource::CLI);
    assert!(ctx.actor.is_none());
    assert!(ctx.actor().is_err());
}

#[test]
fn test_request_context_from_request_prefers_forwarded_for() {
    let req = Request::builder()
        .header("X-Forwarded-For", "10.1.2.3, 172.16.0.1")
        .header("X-Real-IP", "192.168.1.2")
        .finish();
    let ctx = RequestContext::from_request(&req);

    assert_eq!(ctx.source, RequestSource::API);
    assert_eq!(ctx.ip_address.map(|ip| ip.to_string()), Some("10.1.2.3".to_string()));
}

#[test]
fn test_request_context_with_actor() {
    let ctx = RequestContext::for_system().with_actor(Actor {
        user_id: 7,
        username: "rita".to_string(),
        role: UserRole::Reviewer,
        session_id: "sid".to_string(),
    });

    let actor = ctx.actor().unwrap();
    assert_eq!(actor.user_id, 7);
    assert!(!actor.is_admin());
}

#[test]
fn test_request_ids_are_unique() {
    let a = RequestContext::for_system();
    let b = RequestContext::for_system();
    assert_ne!(a.request_id.to_string(), b.request_id.to_string());
}
