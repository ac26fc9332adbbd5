//! Forgot Password Use Case
//!
//! Issues a one-hour reset token for the account behind an email address.
//! The caller learns nothing about whether the account exists.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::reset_token::ResetToken;
use crate::domain::mailer::ResetMailer;
use crate::domain::repository::{ResetTokenRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

pub struct ForgotPasswordUseCase<R, M>
where
    R: UserRepository + ResetTokenRepository,
    M: ResetMailer,
{
    repo: Arc<R>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<R, M> ForgotPasswordUseCase<R, M>
where
    R: UserRepository + ResetTokenRepository,
    M: ResetMailer,
{
    pub fn new(repo: Arc<R>, mailer: Arc<M>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            mailer,
            config,
        }
    }

    /// `Ok(())` whether or not the account exists. Only a malformed email
    /// or a store failure is an error.
    pub async fn execute(&self, email: String) -> AuthResult<()> {
        let email = Email::new(email)?;

        let Some(user) = self.repo.find_user_by_email_or_username(email.as_str()).await? else {
            tracing::info!("Password reset requested for unknown account");
            return Ok(());
        };

        let (raw_token, record) = ResetToken::issue(user.user_id, self.config.reset_token_ttl);
        self.repo.create_reset_token(&record).await?;

        // Delivery failure must not become an account-exists oracle
        if let Err(e) = self
            .mailer
            .send_reset_link(&user.email, &self.config.reset_link(&raw_token))
            .await
        {
            tracing::error!(user_id = %user.user_id, error = %e, "Reset link delivery failed");
            return Ok(());
        }

        tracing::info!(
            user_id = %user.user_id,
            expires_at = %record.expires_at,
            "Password reset token issued"
        );

        Ok(())
    }
}
