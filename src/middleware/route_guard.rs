use crate::api::metrics;
use crate::models::ResolvedSession;
use crate::services::SessionResolver;
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::LOCATION,
    Error, HttpMessage, HttpResponse,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

pub const DASHBOARD_PATH: &str = "/admin/dashboard";
pub const SIGN_IN_PATH: &str = "/sign-in";

/// Pages only meant for visitors without a session.
const AUTH_ONLY_PREFIXES: &[&str] = &["/sign-in", "/sign-up", "/verify"];
/// Pages that need a session.
const PROTECTED_PREFIXES: &[&str] = &[DASHBOARD_PATH, "/dashboard"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    AuthOnly,
    Protected,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    RedirectToDashboard,
    RedirectToSignIn,
    Pass,
}

impl GuardDecision {
    pub fn location(&self) -> Option<&'static str> {
        match self {
            GuardDecision::RedirectToDashboard => Some(DASHBOARD_PATH),
            GuardDecision::RedirectToSignIn => Some(SIGN_IN_PATH),
            GuardDecision::Pass => None,
        }
    }
}

/// `prefix` itself or anything below it, segment-wise.
fn matches_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

pub fn classify(path: &str) -> PathClass {
    if AUTH_ONLY_PREFIXES.iter().any(|p| matches_prefix(path, p)) {
        PathClass::AuthOnly
    } else if PROTECTED_PREFIXES.iter().any(|p| matches_prefix(path, p)) {
        PathClass::Protected
    } else {
        PathClass::Other
    }
}

/// Stateless per-request decision from the path and whether a session resolved.
pub fn decide(path: &str, has_session: bool) -> GuardDecision {
    match (classify(path), has_session) {
        (PathClass::AuthOnly, true) => GuardDecision::RedirectToDashboard,
        (PathClass::Protected, false) => GuardDecision::RedirectToSignIn,
        _ => GuardDecision::Pass,
    }
}

/// Resolves the session cookie on every request and redirects per `decide`.
/// Requests that pass carry a `ResolvedSession` extension when signed in.
pub struct RouteGuard {
    resolver: Arc<dyn SessionResolver>,
    cookie_name: Rc<str>,
}

impl RouteGuard {
    pub fn new(resolver: Arc<dyn SessionResolver>, cookie_name: &str) -> Self {
        Self {
            resolver,
            cookie_name: Rc::from(cookie_name),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RouteGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RouteGuardService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RouteGuardService {
            service: Rc::new(service),
            resolver: Arc::clone(&self.resolver),
            cookie_name: Rc::clone(&self.cookie_name),
        }))
    }
}

pub struct RouteGuardService<S> {
    service: Rc<S>,
    resolver: Arc<dyn SessionResolver>,
    cookie_name: Rc<str>,
}

impl<S, B> Service<ServiceRequest> for RouteGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let resolver = Arc::clone(&self.resolver);
        let token = req.cookie(&self.cookie_name).map(|c| c.value().to_string());

        Box::pin(async move {
            metrics::increment_request_count();

            let session = resolver.resolve(token.as_deref()).await;
            let decision = decide(req.path(), session.is_some());
            log::debug!(
                "🛡️  {} {} session={} -> {:?}",
                req.method(),
                req.path(),
                session.is_some(),
                decision
            );

            match decision.location() {
                None => {
                    if let (Some(token), Some(session)) = (token, session) {
                        req.extensions_mut().insert(ResolvedSession { token, session });
                    }
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Some(location) => {
                    metrics::increment_redirect_count();
                    let response = HttpResponse::TemporaryRedirect()
                        .insert_header((LOCATION, location))
                        .finish();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}
