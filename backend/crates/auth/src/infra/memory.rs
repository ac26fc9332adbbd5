//! In-Memory Repository
//!
//! Process-local store with the same uniqueness and atomicity guarantees
//! as the PostgreSQL implementation. Used by tests and local runs without
//! a database.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entity::{reset_token::ResetToken, user::User};
use crate::domain::repository::{ResetTokenRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, user_id::UserId, user_password::UserPassword, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Default)]
pub struct InMemoryAuthRepository {
    users: RwLock<HashMap<Uuid, User>>,
    reset_tokens: RwLock<HashMap<String, ResetToken>>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored reset tokens
    pub async fn reset_token_count(&self) -> usize {
        self.reset_tokens.read().await.len()
    }

    /// Overwrite a stored reset token's expiry
    pub async fn set_reset_token_expiry(&self, token_hash: &str, expires_at: DateTime<Utc>) -> bool {
        match self.reset_tokens.write().await.get_mut(token_hash) {
            Some(token) => {
                token.expires_at = expires_at;
                true
            }
            None => false,
        }
    }
}

impl UserRepository for InMemoryAuthRepository {
    async fn create_user(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }
        if users
            .values()
            .any(|u| u.user_name.canonical() == user.user_name.canonical())
        {
            return Err(AuthError::UsernameTaken);
        }

        users.insert(*user.user_id.as_uuid(), user.clone());
        Ok(())
    }

    async fn find_user_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.users.read().await.get(user_id.as_uuid()).cloned())
    }

    async fn find_user_by_email_or_username(&self, identifier: &str) -> AuthResult<Option<User>> {
        let key = identifier.trim().to_lowercase();
        let users = self.users.read().await;

        let by_email = users.values().find(|u| u.email.as_str() == key);
        let found = by_email.or_else(|| users.values().find(|u| u.user_name.canonical() == key));

        Ok(found.cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self.users.read().await.values().any(|u| &u.email == email))
    }

    async fn exists_by_username(&self, canonical: &str) -> AuthResult<bool> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|u| u.user_name.canonical() == canonical))
    }

    async fn update_user_password(
        &self,
        user_id: &UserId,
        password: &UserPassword,
    ) -> AuthResult<bool> {
        match self.users.write().await.get_mut(user_id.as_uuid()) {
            Some(user) => {
                user.set_password(password.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_user_role(&self, user_id: &UserId, role: UserRole) -> AuthResult<bool> {
        match self.users.write().await.get_mut(user_id.as_uuid()) {
            Some(user) => {
                user.set_role(role);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl ResetTokenRepository for InMemoryAuthRepository {
    async fn create_reset_token(&self, token: &ResetToken) -> AuthResult<()> {
        self.reset_tokens
            .write()
            .await
            .insert(token.token_hash.clone(), token.clone());
        Ok(())
    }

    async fn find_reset_token(&self, token_hash: &str) -> AuthResult<Option<ResetToken>> {
        Ok(self.reset_tokens.read().await.get(token_hash).cloned())
    }

    async fn delete_reset_token(&self, token_hash: &str) -> AuthResult<bool> {
        Ok(self.reset_tokens.write().await.remove(token_hash).is_some())
    }

    async fn cleanup_expired_reset_tokens(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let mut tokens = self.reset_tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, token| !token.is_expired_at(now));
        Ok((before - tokens.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_name::UserName;
    use chrono::Duration;
    use platform::password::CredentialHasher;
    use crate::domain::value_object::user_password::RawPassword;

    fn user(email: &str, name: &str) -> User {
        let hasher = CredentialHasher::new(None).unwrap();
        let password = UserPassword::from_raw(
            &RawPassword::new("Abcdef1!".to_string()).unwrap(),
            &hasher,
        )
        .unwrap();
        User::new(
            Email::new(email).unwrap(),
            UserName::new(name).unwrap(),
            password,
        )
    }

    #[tokio::test]
    async fn test_create_user_conflicts() {
        let repo = InMemoryAuthRepository::new();
        repo.create_user(&user("a@x.com", "abc")).await.unwrap();

        assert!(matches!(
            repo.create_user(&user("A@X.com", "other")).await,
            Err(AuthError::EmailTaken)
        ));
        assert!(matches!(
            repo.create_user(&user("b@x.com", "ABC")).await,
            Err(AuthError::UsernameTaken)
        ));
    }

    #[tokio::test]
    async fn test_find_by_email_or_username() {
        let repo = InMemoryAuthRepository::new();
        let created = user("a@x.com", "Reader");
        repo.create_user(&created).await.unwrap();

        let by_email = repo.find_user_by_email_or_username("A@x.com").await.unwrap();
        let by_name = repo.find_user_by_email_or_username("reader").await.unwrap();
        assert_eq!(by_email.unwrap().user_id, created.user_id);
        assert_eq!(by_name.unwrap().user_id, created.user_id);
        assert!(repo.find_user_by_email_or_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_reset_token_once() {
        let repo = InMemoryAuthRepository::new();
        let (_, token) = ResetToken::issue(UserId::new(), Duration::hours(1));
        repo.create_reset_token(&token).await.unwrap();

        assert!(repo.delete_reset_token(&token.token_hash).await.unwrap());
        assert!(!repo.delete_reset_token(&token.token_hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_cleanup_expired_reset_tokens() {
        let repo = InMemoryAuthRepository::new();
        let (_, live) = ResetToken::issue(UserId::new(), Duration::hours(1));
        let (_, stale) = ResetToken::issue(UserId::new(), Duration::hours(-1));
        repo.create_reset_token(&live).await.unwrap();
        repo.create_reset_token(&stale).await.unwrap();

        assert_eq!(repo.cleanup_expired_reset_tokens(Utc::now()).await.unwrap(), 1);
        assert!(repo.find_reset_token(&live.token_hash).await.unwrap().is_some());
        assert!(repo.find_reset_token(&stale.token_hash).await.unwrap().is_none());
    }
}
