//! Auth Router
//!
//! Route groups and their access classification:
//!
//! | Group          | Access      | Token source | Routes |
//! |----------------|-------------|--------------|--------|
//! | credentials    | `Public`    | none         | `POST /auth/signup`, `/auth/login`, `/auth/logout`, `/auth/forgot-password`, `/auth/reset-password` |
//! | session        | `Protected` | cookie       | `GET /auth/user` |
//! | programmatic   | `Protected` | bearer       | `POST /auth/refresh` |
//! | admin          | `AdminOnly` | cookie       | `GET /admin/users/{id}`, `PATCH /admin/users/{id}/role` |
//!
//! All groups use the JSON API transport. Page routes served elsewhere are
//! wrapped with [`page_gate`].

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::resolve_session::{SessionResolver, TokenSource};
use crate::domain::access::{RouteAccess, Transport};
use crate::domain::mailer::ResetMailer;
use crate::domain::repository::AuthStore;
use crate::error::AuthResult;
use crate::infra::mailer::TracingResetMailer;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AccessGate, access_gate};

/// Create the Auth router with the PostgreSQL repository and the
/// development mailer
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> AuthResult<Router> {
    auth_router_generic(Arc::new(repo), Arc::new(TracingResetMailer), config)
}

/// Create a generic Auth router for any store and mailer
pub fn auth_router_generic<R, M>(repo: Arc<R>, mailer: Arc<M>, config: AuthConfig) -> AuthResult<Router>
where
    R: AuthStore,
    M: ResetMailer + Send + Sync + 'static,
{
    let state = AuthAppState::new(repo, mailer, config)?;

    let cookie = SessionResolver::new(
        state.tokens.clone(),
        TokenSource::Cookie(state.config.cookie_name.clone()),
    );
    let bearer = SessionResolver::new(state.tokens.clone(), TokenSource::Bearer);

    let gate = |access: RouteAccess, resolver: &SessionResolver| {
        AccessGate::new(
            access,
            Transport::Api,
            resolver.clone(),
            state.repo.clone(),
            state.config.clone(),
        )
    };

    let credentials = Router::new()
        .route("/auth/signup", post(handlers::sign_up::<R, M>))
        .route("/auth/login", post(handlers::sign_in::<R, M>))
        .route("/auth/logout", post(handlers::sign_out::<R, M>))
        .route("/auth/forgot-password", post(handlers::forgot_password::<R, M>))
        .route("/auth/reset-password", post(handlers::reset_password::<R, M>));

    let session = Router::new()
        .route("/auth/user", get(handlers::current_user::<R, M>))
        .route_layer(middleware::from_fn_with_state(
            gate(RouteAccess::Protected, &cookie),
            access_gate::<R>,
        ));

    let programmatic = Router::new()
        .route("/auth/refresh", post(handlers::refresh_token::<R, M>))
        .route_layer(middleware::from_fn_with_state(
            gate(RouteAccess::Protected, &bearer),
            access_gate::<R>,
        ));

    let admin = Router::new()
        .route("/admin/users/{id}", get(handlers::get_user::<R, M>))
        .route("/admin/users/{id}/role", patch(handlers::change_role::<R, M>))
        .route_layer(middleware::from_fn_with_state(
            gate(RouteAccess::AdminOnly, &cookie),
            access_gate::<R>,
        ));

    Ok(Router::new()
        .merge(credentials)
        .merge(session)
        .merge(programmatic)
        .merge(admin)
        .with_state(state))
}

/// Gate a page router with the browser transport: anonymous visitors of
/// protected pages are redirected to the login page, signed-in visitors of
/// auth-only pages are sent home.
pub fn page_gate<R, S>(
    router: Router<S>,
    access: RouteAccess,
    repo: Arc<R>,
    config: AuthConfig,
) -> AuthResult<Router<S>>
where
    R: AuthStore,
    S: Clone + Send + Sync + 'static,
{
    let resolver = SessionResolver::new(
        Arc::new(config.token_service()?),
        TokenSource::Cookie(config.cookie_name.clone()),
    );
    let gate = AccessGate::new(access, Transport::Browser, resolver, repo, Arc::new(config));

    Ok(router.route_layer(middleware::from_fn_with_state(gate, access_gate::<R>)))
}
