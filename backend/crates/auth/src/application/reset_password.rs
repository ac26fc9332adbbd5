//! Reset Password Use Case
//!
//! Consumes a reset token and sets a new password. Tokens are single use
//! by deletion: the call that removes the row is the only one allowed to
//! change the password.

use std::sync::Arc;

use platform::password::CredentialHasher;

use crate::domain::entity::reset_token::ResetToken;
use crate::domain::repository::{ResetTokenRepository, UserRepository};
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};

pub struct ResetPasswordInput {
    pub token: String,
    pub password: String,
}

pub struct ResetPasswordUseCase<R>
where
    R: UserRepository + ResetTokenRepository,
{
    repo: Arc<R>,
    hasher: Arc<CredentialHasher>,
}

impl<R> ResetPasswordUseCase<R>
where
    R: UserRepository + ResetTokenRepository,
{
    pub fn new(repo: Arc<R>, hasher: Arc<CredentialHasher>) -> Self {
        Self { repo, hasher }
    }

    pub async fn execute(&self, input: ResetPasswordInput) -> AuthResult<()> {
        // Policy first, before any lookup
        let raw_password = RawPassword::new(input.password)?;

        let token = input.token.trim();
        if token.is_empty() {
            return Err(AuthError::InvalidToken);
        }
        let token_hash = ResetToken::hash_of(token);

        let record = self
            .repo
            .find_reset_token(&token_hash)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if record.is_expired() {
            self.repo.delete_reset_token(&token_hash).await?;
            return Err(AuthError::ExpiredToken);
        }

        // A concurrent consumer got here first
        if !self.repo.delete_reset_token(&token_hash).await? {
            return Err(AuthError::InvalidToken);
        }

        let password = UserPassword::from_raw(&raw_password, &self.hasher)?;
        if !self
            .repo
            .update_user_password(&record.user_id, &password)
            .await?
        {
            tracing::warn!(user_id = %record.user_id, "Reset token owner no longer exists");
            return Err(AuthError::InvalidToken);
        }

        tracing::info!(user_id = %record.user_id, "Password reset completed");

        Ok(())
    }
}
