//! User Password Value Object
//!
//! Domain wrappers over `platform::password`: policy errors become
//! field-level validation errors, hashing goes through the shared
//! [`CredentialHasher`].

use platform::password::{ClearTextPassword, CredentialHasher, HashedPassword};
use std::fmt;

use crate::error::{AuthError, AuthResult};

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input. Zeroized on drop.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Password chosen by the user (sign-up, reset). Policy is enforced.
    pub fn new(raw: String) -> AuthResult<Self> {
        Ok(Self(ClearTextPassword::new(raw)?))
    }

    /// Password presented at login. Only normalized, never rejected.
    pub fn for_login(raw: String) -> Self {
        Self(ClearTextPassword::for_verification(raw))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Argon2id PHC string as stored on the user row
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword, hasher: &CredentialHasher) -> AuthResult<Self> {
        Ok(Self(hasher.hash(raw.inner())?))
    }

    /// Create from PHC string (from database)
    pub fn from_phc_string(phc_string: impl Into<String>) -> AuthResult<Self> {
        let hashed = HashedPassword::from_phc_string(phc_string)
            .map_err(|_| AuthError::Internal("Invalid password hash in database".to_string()))?;
        Ok(Self(hashed))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    pub fn verify(&self, raw: &RawPassword, hasher: &CredentialHasher) -> bool {
        hasher.verify(raw.inner(), &self.0)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_password_policy() {
        assert!(RawPassword::new("Abcdef1!".to_string()).is_ok());
        assert!(matches!(
            RawPassword::new("abcdefgh".to_string()),
            Err(AuthError::PasswordPolicy(_))
        ));
        assert!(RawPassword::new(String::new()).is_err());
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = CredentialHasher::new(None).unwrap();
        let raw = RawPassword::new("TestPassword123!".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&raw, &hasher).unwrap();

        assert!(hashed.verify(&RawPassword::for_login("TestPassword123!".into()), &hasher));
        assert!(!hashed.verify(&RawPassword::for_login("WrongPassword123!".into()), &hasher));
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let hasher = CredentialHasher::new(None).unwrap();
        let raw = RawPassword::new("TestPassword123!".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&raw, &hasher).unwrap();

        let restored = UserPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(&raw, &hasher));
        assert!(UserPassword::from_phc_string("plaintext").is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let raw = RawPassword::new("SecretPassword123!".to_string()).unwrap();
        let debug = format!("{:?}", raw);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("Secret"));
    }
}
