//! Access Gate Middleware
//!
//! Runs once per request before the handler. Resolves the session with the
//! route group's extraction strategy, asks [`evaluate`] for a decision and
//! turns it into a redirect, a 401/403, or a pass-through with the
//! [`Session`] stored in request extensions.

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, Request, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::resolve_session::SessionResolver;
use crate::domain::access::{GateDecision, RouteAccess, Transport, evaluate};
use crate::domain::entity::session::Session;
use crate::domain::repository::AuthStore;
use crate::error::AuthError;

/// Gate configuration for one route group
pub struct AccessGate<R> {
    pub access: RouteAccess,
    pub transport: Transport,
    pub resolver: SessionResolver,
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> Clone for AccessGate<R> {
    fn clone(&self) -> Self {
        Self {
            access: self.access,
            transport: self.transport,
            resolver: self.resolver.clone(),
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R> AccessGate<R>
where
    R: AuthStore,
{
    pub fn new(
        access: RouteAccess,
        transport: Transport,
        resolver: SessionResolver,
        repo: Arc<R>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            access,
            transport,
            resolver,
            repo,
            config,
        }
    }

    /// Admin-only routes re-read the live role; everything else trusts the
    /// verified token.
    async fn session(&self, headers: &HeaderMap) -> Result<Option<Session>, AuthError> {
        match self.access {
            RouteAccess::AdminOnly => self.resolver.resolve_live(headers, self.repo.as_ref()).await,
            _ => Ok(self.resolver.resolve(headers)),
        }
    }

    fn login_redirect(&self, uri: &Uri) -> Response {
        let target = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let callback: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();

        Redirect::temporary(&format!("{}?callbackUrl={}", self.config.login_path, callback))
            .into_response()
    }
}

/// Middleware entry point, installed with `middleware::from_fn_with_state`
pub async fn access_gate<R>(
    State(gate): State<AccessGate<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    R: AuthStore,
{
    let session = match gate.session(req.headers()).await {
        Ok(session) => session,
        Err(e) => return e.into_response(),
    };

    let decision = evaluate(gate.access, gate.transport, session.as_ref().map(|s| s.role));

    match decision {
        GateDecision::Proceed => {
            if let Some(session) = session {
                req.extensions_mut().insert(session);
            }
            next.run(req).await
        }
        GateDecision::RedirectToLogin => gate.login_redirect(req.uri()),
        GateDecision::RedirectHome => Redirect::temporary(&gate.config.home_path).into_response(),
        GateDecision::Unauthorized => {
            let mut response = AuthError::Unauthenticated.into_response();
            response
                .headers_mut()
                .insert("X-Auth-Required", HeaderValue::from_static("true"));
            response
        }
        GateDecision::Forbidden => {
            if let Some(session) = &session {
                tracing::warn!(
                    user_id = %session.user_id,
                    role = %session.role,
                    path = %req.uri().path(),
                    "Forbidden: insufficient role"
                );
            }
            AuthError::Forbidden.into_response()
        }
    }
}

// ============================================================================
// Session Extractor
// ============================================================================

/// Session placed in extensions by [`access_gate`].
///
/// Only usable behind a `Protected` or `AdminOnly` gate; anywhere else it
/// rejects with 401.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(CurrentSession)
            .ok_or(AuthError::Unauthenticated)
    }
}
