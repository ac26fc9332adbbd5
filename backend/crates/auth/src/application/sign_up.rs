//! Sign Up Use Case
//!
//! Creates a new user account and opens a session for it.

use std::sync::Arc;

use platform::password::CredentialHasher;

use crate::application::config::AuthConfig;
use crate::application::token::{IdentityClaim, IssuedToken, TokenKind, TokenService};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Sign up output
pub struct SignUpOutput {
    pub user: User,
    pub session: IssuedToken,
}

/// Sign up use case
pub struct SignUpUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    hasher: Arc<CredentialHasher>,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl<R> SignUpUseCase<R>
where
    R: UserRepository,
{
    pub fn new(
        repo: Arc<R>,
        hasher: Arc<CredentialHasher>,
        tokens: Arc<TokenService>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            repo,
            hasher,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        // All input checks before any store access
        let email = Email::new(input.email)?;
        let user_name = UserName::new(input.username)?;
        let raw_password = RawPassword::new(input.password)?;

        // Checked in this order so a duplicate email always wins
        if self.repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }
        if self.repo.exists_by_username(user_name.canonical()).await? {
            return Err(AuthError::UsernameTaken);
        }

        let password = UserPassword::from_raw(&raw_password, &self.hasher)?;
        let user = User::new(email, user_name, password);

        // Unique constraints still decide if a concurrent sign-up slipped in
        self.repo.create_user(&user).await?;

        let session = self.tokens.issue(
            &IdentityClaim::from(&user),
            TokenKind::Session,
            self.config.session_ttl,
        )?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User signed up"
        );

        Ok(SignUpOutput { user, session })
    }
}
