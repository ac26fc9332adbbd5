//! Current User Use Case
//!
//! Loads the live record behind a session.

use std::sync::Arc;

use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct CurrentUserUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> CurrentUserUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// A valid token whose user has since been deleted is unauthenticated.
    pub async fn execute(&self, session: &Session) -> AuthResult<User> {
        self.repo
            .find_user_by_id(&session.user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)
    }
}
