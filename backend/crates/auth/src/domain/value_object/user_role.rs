use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AuthError;

/// Capability tier. Declaration order is the privilege order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
#[repr(i16)]
pub enum UserRole {
    #[default]
    User = 0,
    Moderator = 1,
    Admin = 2,
}

impl UserRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            User => "USER",
            Moderator => "MODERATOR",
            Admin => "ADMIN",
        }
    }

    #[inline]
    pub const fn from_id(id: i16) -> Option<Self> {
        use UserRole::*;
        match id {
            0 => Some(User),
            1 => Some(Moderator),
            2 => Some(Admin),
            _ => None,
        }
    }

    /// Role hierarchy check: `self` grants anything `required` grants
    #[inline]
    pub fn satisfies(&self, required: UserRole) -> bool {
        *self >= required
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// Does a holder of `actual` pass a `required` gate
pub fn has_permission(actual: UserRole, required: UserRole) -> bool {
    actual.satisfies(required)
}

impl FromStr for UserRole {
    type Err = AuthError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        use UserRole::*;
        match code.trim().to_ascii_uppercase().as_str() {
            "USER" => Ok(User),
            "MODERATOR" => Ok(Moderator),
            "ADMIN" => Ok(Admin),
            _ => Err(AuthError::validation("role", format!("Unknown role '{code}'"))),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_id() {
        assert_eq!(UserRole::from_id(0), Some(UserRole::User));
        assert_eq!(UserRole::from_id(1), Some(UserRole::Moderator));
        assert_eq!(UserRole::from_id(2), Some(UserRole::Admin));
        assert_eq!(UserRole::from_id(3), None);
        assert_eq!(UserRole::from_id(-1), None);
    }

    #[test]
    fn test_user_role_from_code() {
        assert_eq!("USER".parse::<UserRole>().unwrap(), UserRole::User);
        assert_eq!("moderator".parse::<UserRole>().unwrap(), UserRole::Moderator);
        assert_eq!("Admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!("super_admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_user_role_serde() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(
            serde_json::from_str::<UserRole>("\"MODERATOR\"").unwrap(),
            UserRole::Moderator
        );
    }

    #[test]
    fn test_has_permission_is_hierarchical() {
        use UserRole::*;
        let roles = [User, Moderator, Admin];
        for actual in roles {
            for required in roles {
                assert_eq!(has_permission(actual, required), actual >= required);
            }
        }
        assert!(has_permission(Admin, Admin));
        assert!(!has_permission(Moderator, Admin));
        assert!(!has_permission(User, Admin));
        assert!(has_permission(User, User));
    }
}
