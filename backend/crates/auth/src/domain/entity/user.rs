//! User Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email, user_id::UserId, user_name::UserName, user_password::UserPassword,
    user_role::UserRole,
};

/// Account record as owned by the user store
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique, lowercase
    pub email: Email,
    /// Unique on canonical form
    pub user_name: UserName,
    pub password: UserPassword,
    pub user_role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with the default role
    pub fn new(email: Email, user_name: UserName, password: UserPassword) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email,
            user_name,
            password,
            user_role: UserRole::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_role(&mut self, role: UserRole) {
        self.user_role = role;
        self.updated_at = Utc::now();
    }

    pub fn set_password(&mut self, password: UserPassword) {
        self.password = password;
        self.updated_at = Utc::now();
    }
}
