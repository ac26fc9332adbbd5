//! Refresh Token Use Case
//!
//! Exchanges a bearer token for a fresh refresh-kind token built from the
//! user's current record.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::{IdentityClaim, IssuedToken, TokenKind, TokenService};
use crate::domain::entity::session::Session;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct RefreshTokenUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl<R> RefreshTokenUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, session: &Session) -> AuthResult<IssuedToken> {
        let user = self
            .repo
            .find_user_by_id(&session.user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        let issued = self.tokens.issue(
            &IdentityClaim::from(&user),
            TokenKind::Refresh,
            self.config.refresh_ttl,
        )?;

        tracing::info!(user_id = %user.user_id, "Refresh token issued");

        Ok(issued)
    }
}
