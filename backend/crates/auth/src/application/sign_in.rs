//! Sign In Use Case
//!
//! Authenticates a user by email or user name and opens a session.
//!
//! Unknown identifier and wrong password fail identically, and both paths
//! pay for exactly one Argon2 verification.

use std::sync::Arc;

use platform::password::CredentialHasher;

use crate::application::config::AuthConfig;
use crate::application::token::{IdentityClaim, IssuedToken, TokenKind, TokenService};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{user_name::UserName, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    /// Email or user name
    pub identifier: String,
    pub password: String,
}

/// Sign in output
pub struct SignInOutput {
    pub user: User,
    pub session: IssuedToken,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    hasher: Arc<CredentialHasher>,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl<R> SignInUseCase<R>
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

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let identifier = UserName::lookup_key(&input.identifier);
        if identifier.is_empty() {
            return Err(AuthError::validation("email", "Email or username is required"));
        }

        let raw_password = RawPassword::for_login(input.password);

        let user = self.repo.find_user_by_email_or_username(&identifier).await?;

        let verified = match &user {
            Some(user) => user.password.verify(&raw_password, &self.hasher),
            None => self.hasher.verify_absent(raw_password.inner()),
        };

        let user = match user {
            Some(user) if verified => user,
            _ => return Err(AuthError::InvalidCredentials),
        };

        let session = self.tokens.issue(
            &IdentityClaim::from(&user),
            TokenKind::Session,
            self.config.session_ttl,
        )?;

        tracing::info!(
            user_id = %user.user_id,
            role = %user.user_role,
            "User signed in"
        );

        Ok(SignInOutput { user, session })
    }
}
