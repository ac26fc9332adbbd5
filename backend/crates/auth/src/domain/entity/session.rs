//! Session
//!
//! Request-scoped identity rebuilt from a verified token on every request.
//! Never persisted.

use crate::domain::value_object::{user_id::UserId, user_role::UserRole};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub email: String,
    pub username: String,
    pub role: UserRole,
}

impl Session {
    pub fn has_permission(&self, required: UserRole) -> bool {
        self.role.satisfies(required)
    }
}
