//! Password Hashing and Verification
//!
//! - Argon2id hashing with fixed cost parameters and a random salt per hash
//! - Password policy (length and character classes) checked before hashing
//! - Zeroization of clear text material
//! - Optional application-wide pepper
//!
//! Verification goes through Argon2's own constant-time check; clear text is
//! never compared directly.

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length in characters
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Symbols that satisfy the "one symbol" policy rule
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?/~`";

/// Argon2id memory cost (19 MiB)
const ARGON2_MEMORY_KIB: u32 = 19_456;
/// Argon2id passes
const ARGON2_ITERATIONS: u32 = 2;
/// Argon2id lanes
const ARGON2_PARALLELISM: u32 = 1;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,

    #[error("Password must contain at least one lowercase letter")]
    MissingLowercase,

    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,

    #[error("Password must contain at least one digit")]
    MissingDigit,

    #[error("Password must contain at least one symbol ({symbols})", symbols = PASSWORD_SYMBOLS)]
    MissingSymbol,
}

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Not `Clone`, and `Debug` output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a password that satisfies the policy.
    ///
    /// Unicode is normalized with NFKC first, then:
    /// - 8 to 128 characters
    /// - no control characters
    /// - at least one lowercase, one uppercase, one digit and one symbol
    ///   from [`PASSWORD_SYMBOLS`]
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self::for_verification(raw);
        password.check_policy()?;
        Ok(password)
    }

    /// Normalize without applying the policy.
    ///
    /// Used when checking credentials at login: passwords stored under an
    /// older policy must still verify.
    pub fn for_verification(raw: String) -> Self {
        let raw = Zeroizing::new(raw);
        Self(raw.nfkc().collect())
    }

    fn check_policy(&self) -> Result<(), PasswordPolicyError> {
        let password = self.0.as_str();

        if password.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        // Count code points, not bytes
        let char_count = password.chars().count();

        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if password.chars().any(|ch| ch.is_control()) {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        if !password.chars().any(|c| c.is_lowercase()) {
            return Err(PasswordPolicyError::MissingLowercase);
        }
        if !password.chars().any(|c| c.is_uppercase()) {
            return Err(PasswordPolicyError::MissingUppercase);
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(PasswordPolicyError::MissingDigit);
        }
        if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
            return Err(PasswordPolicyError::MissingSymbol);
        }

        Ok(())
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(self.0.as_bytes().to_vec());
        if let Some(p) = pepper {
            bytes.extend_from_slice(p);
        }
        bytes
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
///
/// The PHC string carries algorithm, version, parameters, salt and digest.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Credential Hasher
// ============================================================================

/// One-way password hashing with a fixed work factor.
///
/// Holds a hash of a throwaway random password so that checks against
/// unknown accounts cost the same as checks against real ones.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
    pepper: Option<Vec<u8>>,
    dummy: HashedPassword,
}

impl CredentialHasher {
    /// Build the hasher. `pepper` must be identical for hash and verify.
    pub fn new(pepper: Option<Vec<u8>>) -> Result<Self, PasswordHashError> {
        let params = Params::new(
            ARGON2_MEMORY_KIB,
            ARGON2_ITERATIONS,
            ARGON2_PARALLELISM,
            None,
        )
        .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut hasher = Self {
            argon2,
            pepper,
            dummy: HashedPassword {
                hash: String::new(),
            },
        };

        let throwaway = ClearTextPassword(crate::crypto::random_token(24));
        hasher.dummy = hasher.hash(&throwaway)?;

        Ok(hasher)
    }

    /// Hash with a fresh random salt; equal inputs give different outputs.
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(OsRng);
        let input = password.peppered(self.pepper.as_deref());

        let hash = self
            .argon2
            .hash_password(&input, &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }

    /// Verify a password against a stored hash.
    pub fn verify(&self, password: &ClearTextPassword, hashed: &HashedPassword) -> bool {
        let parsed_hash = match PasswordHash::new(&hashed.hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        let input = password.peppered(self.pepper.as_deref());

        self.argon2.verify_password(&input, &parsed_hash).is_ok()
    }

    /// Burn one verification's worth of work for an account that does not
    /// exist. Always `false`.
    pub fn verify_absent(&self, password: &ClearTextPassword) -> bool {
        let _ = self.verify(password, &self.dummy);
        false
    }
}

impl fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHasher")
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pw(s: &str) -> ClearTextPassword {
        ClearTextPassword::for_verification(s.to_string())
    }

    #[test]
    fn test_password_too_short() {
        let result = ClearTextPassword::new("Ab1!".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::TooShort { .. })));
    }

    #[test]
    fn test_password_too_long() {
        let long_password = format!("Aa1!{}", "a".repeat(MAX_PASSWORD_LENGTH));
        let result = ClearTextPassword::new(long_password);
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_password_whitespace_only() {
        let result = ClearTextPassword::new("        ".to_string());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));
    }

    #[test]
    fn test_password_character_classes() {
        assert_eq!(
            ClearTextPassword::new("ABCDEF1!".to_string()).unwrap_err(),
            PasswordPolicyError::MissingLowercase
        );
        assert_eq!(
            ClearTextPassword::new("abcdef1!".to_string()).unwrap_err(),
            PasswordPolicyError::MissingUppercase
        );
        assert_eq!(
            ClearTextPassword::new("Abcdefg!".to_string()).unwrap_err(),
            PasswordPolicyError::MissingDigit
        );
        assert_eq!(
            ClearTextPassword::new("Abcdefg1".to_string()).unwrap_err(),
            PasswordPolicyError::MissingSymbol
        );
    }

    #[test]
    fn test_password_control_character() {
        let result = ClearTextPassword::new("Abcdef1!\u{0007}".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::InvalidCharacter)));
    }

    #[test]
    fn test_valid_password() {
        assert!(ClearTextPassword::new("Abcdef1!".to_string()).is_ok());
        assert!(ClearTextPassword::new("MySecure#Pass2024".to_string()).is_ok());
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = CredentialHasher::new(None).unwrap();
        let hashed = hasher.hash(&pw("TestPassword123!")).unwrap();

        assert!(hasher.verify(&pw("TestPassword123!"), &hashed));
        assert!(!hasher.verify(&pw("WrongPassword123!"), &hashed));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let hasher = CredentialHasher::new(None).unwrap();
        let a = hasher.hash(&pw("TestPassword123!")).unwrap();
        let b = hasher.hash(&pw("TestPassword123!")).unwrap();
        assert_ne!(a.as_phc_string(), b.as_phc_string());
        assert!(a.as_phc_string().starts_with("$argon2id$"));
    }

    #[test]
    fn test_hash_with_pepper() {
        let peppered = CredentialHasher::new(Some(b"my_secret_pepper".to_vec())).unwrap();
        let plain = CredentialHasher::new(None).unwrap();
        let other = CredentialHasher::new(Some(b"wrong_pepper".to_vec())).unwrap();

        let hashed = peppered.hash(&pw("TestPassword123!")).unwrap();

        assert!(peppered.verify(&pw("TestPassword123!"), &hashed));
        assert!(!plain.verify(&pw("TestPassword123!"), &hashed));
        assert!(!other.verify(&pw("TestPassword123!"), &hashed));
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let hasher = CredentialHasher::new(None).unwrap();
        let hashed = hasher.hash(&pw("TestPassword123!")).unwrap();

        let restored = HashedPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(hasher.verify(&pw("TestPassword123!"), &restored));
    }

    #[test]
    fn test_invalid_phc_string() {
        assert!(HashedPassword::from_phc_string("not_a_valid_hash").is_err());
    }

    #[test]
    fn test_verify_absent_is_false() {
        let hasher = CredentialHasher::new(None).unwrap();
        assert!(!hasher.verify_absent(&pw("anything")));
    }

    #[test]
    fn test_nfkc_normalization() {
        // Fullwidth forms normalize to ASCII, so both spellings verify
        let hasher = CredentialHasher::new(None).unwrap();
        let hashed = hasher.hash(&pw("Abcdef1!")).unwrap();
        assert!(hasher.verify(&pw("Ａｂｃｄｅｆ１！"), &hashed));
    }

    #[test]
    fn test_debug_redaction() {
        let password = pw("secret");
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));
    }
}
