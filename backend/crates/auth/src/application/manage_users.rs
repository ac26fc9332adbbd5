//! Admin User Management
//!
//! Lookup and role changes. Callers are admin-gated with a live role check.

use std::sync::Arc;

use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{user_id::UserId, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

pub struct GetUserUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> GetUserUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<User> {
        self.repo
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

pub struct ChangeRoleUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> ChangeRoleUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, actor: &Session, target: UserId, role: UserRole) -> AuthResult<User> {
        // An admin demoting themselves could leave nobody able to undo it
        if actor.user_id == target && !role.satisfies(UserRole::Admin) {
            return Err(AuthError::validation(
                "role",
                "Admins cannot remove their own admin role",
            ));
        }

        if !self.repo.update_user_role(&target, role).await? {
            return Err(AuthError::UserNotFound);
        }

        let user = self
            .repo
            .find_user_by_id(&target)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        tracing::info!(
            actor = %actor.user_id,
            user_id = %user.user_id,
            role = %user.user_role,
            "User role changed"
        );

        Ok(user)
    }
}
