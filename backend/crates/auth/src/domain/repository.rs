//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the
//! infrastructure layer. Every method is a single atomic store call.

use chrono::{DateTime, Utc};

use crate::domain::entity::{reset_token::ResetToken, user::User};
use crate::domain::value_object::{
    email::Email, user_id::UserId, user_password::UserPassword, user_role::UserRole,
};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user. Fails with `EmailTaken` / `UsernameTaken` on a
    /// unique-key conflict.
    async fn create_user(&self, user: &User) -> AuthResult<()>;

    async fn find_user_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Match on lowercase email or canonical user name
    async fn find_user_by_email_or_username(&self, identifier: &str) -> AuthResult<Option<User>>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// `canonical` is the lowercase user name
    async fn exists_by_username(&self, canonical: &str) -> AuthResult<bool>;

    /// Returns false when no such user exists
    async fn update_user_password(
        &self,
        user_id: &UserId,
        password: &UserPassword,
    ) -> AuthResult<bool>;

    /// Returns false when no such user exists
    async fn update_user_role(&self, user_id: &UserId, role: UserRole) -> AuthResult<bool>;
}

/// Password reset token repository trait
#[trait_variant::make(ResetTokenRepository: Send)]
pub trait LocalResetTokenRepository {
    async fn create_reset_token(&self, token: &ResetToken) -> AuthResult<()>;

    /// Look up by digest
    async fn find_reset_token(&self, token_hash: &str) -> AuthResult<Option<ResetToken>>;

    /// Returns true only for the caller that actually removed the row
    async fn delete_reset_token(&self, token_hash: &str) -> AuthResult<bool>;

    /// Remove every token expired as of `now`
    async fn cleanup_expired_reset_tokens(&self, now: DateTime<Utc>) -> AuthResult<u64>;
}

/// Everything the auth core needs from one store handle
pub trait AuthStore: UserRepository + ResetTokenRepository + Send + Sync + 'static {}

impl<T> AuthStore for T where T: UserRepository + ResetTokenRepository + Send + Sync + 'static {}
