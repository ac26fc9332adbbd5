//! Session Resolver
//!
//! Turns an incoming request's headers into a [`Session`] or anonymity.
//! The extraction strategy is chosen when a route group is registered:
//! page and browser flows read the session cookie, programmatic clients
//! send `Authorization: Bearer`. The two are never merged.

use std::sync::Arc;

use axum::http::HeaderMap;
use platform::cookie::{extract_bearer, extract_cookie};

use crate::application::token::{IdentityClaim, TokenKind, TokenService};
use crate::domain::entity::session::Session;
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;

/// Where the token is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// Named HTTP-only cookie. Session tokens only.
    Cookie(String),
    /// Authorization header. Session or refresh tokens.
    Bearer,
}

impl TokenSource {
    fn accepted_kinds(&self) -> &'static [TokenKind] {
        match self {
            TokenSource::Cookie(_) => &[TokenKind::Session],
            TokenSource::Bearer => &[TokenKind::Session, TokenKind::Refresh],
        }
    }

    fn extract(&self, headers: &HeaderMap) -> Option<String> {
        match self {
            TokenSource::Cookie(name) => extract_cookie(headers, name),
            TokenSource::Bearer => extract_bearer(headers),
        }
    }
}

#[derive(Clone)]
pub struct SessionResolver {
    tokens: Arc<TokenService>,
    source: TokenSource,
}

impl SessionResolver {
    pub fn new(tokens: Arc<TokenService>, source: TokenSource) -> Self {
        Self { tokens, source }
    }

    pub fn source(&self) -> &TokenSource {
        &self.source
    }

    /// Session from the token alone. Anonymous is `None`, never an error.
    pub fn resolve(&self, headers: &HeaderMap) -> Option<Session> {
        let token = self.source.extract(headers)?;
        self.tokens
            .verify(&token, self.source.accepted_kinds())
            .map(Session::from)
    }

    /// Session with role and profile re-read from the store.
    ///
    /// A token minted before a demotion must not keep its old role, so
    /// sensitive checks go through here. A deleted user is anonymous.
    pub async fn resolve_live<R>(&self, headers: &HeaderMap, repo: &R) -> AuthResult<Option<Session>>
    where
        R: UserRepository,
    {
        let Some(session) = self.resolve(headers) else {
            return Ok(None);
        };

        let Some(user) = repo.find_user_by_id(&session.user_id).await? else {
            tracing::debug!(user_id = %session.user_id, "Token subject no longer exists");
            return Ok(None);
        };

        if user.user_role != session.role {
            tracing::info!(
                user_id = %user.user_id,
                token_role = %session.role,
                live_role = %user.user_role,
                "Token role is stale, using live role"
            );
        }

        Ok(Some(IdentityClaim::from(&user).into()))
    }
}
