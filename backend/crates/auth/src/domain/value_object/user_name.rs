//! User Name Value Object
//!
//! Public handle shown next to bookmarks and chat history, and accepted
//! as a login identifier alongside the email address.
//!
//! ## Invariants
//! - 3 to 30 characters after NFKC normalization and trimming
//! - ASCII only: a-z, 0-9, `_`, `.`, `-`
//! - Starts and ends with a letter, digit or `_`
//! - No consecutive dots
//! - Not a reserved word
//!
//! Uppercase input is accepted; uniqueness is decided on the lowercase
//! canonical form.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

use crate::error::AuthError;

// ============================================================================
// Constants
// ============================================================================

pub const USER_NAME_MIN_LENGTH: usize = 3;
pub const USER_NAME_MAX_LENGTH: usize = 30;

const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-'];

/// Names that collide with routes or staff identities
const RESERVED_WORDS: &[&str] = &[
    "admin",
    "administrator",
    "root",
    "system",
    "moderator",
    "support",
    "api",
    "auth",
    "login",
    "logout",
    "signup",
    "register",
    "reset",
    "forgot-password",
    "reset-password",
    "user",
    "users",
    "settings",
    "null",
    "undefined",
    "anonymous",
];

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("Username cannot be empty")]
    Empty,

    #[error("Username is too short ({length} chars, minimum {min})")]
    TooShort { length: usize, min: usize },

    #[error("Username is too long ({length} chars, maximum {max})")]
    TooLong { length: usize, max: usize },

    #[error("Invalid character '{ch}' at position {position}. Only a-z, 0-9, _, ., - are allowed")]
    InvalidCharacter { ch: char, position: usize },

    #[error("Username must start and end with a-z, 0-9, or _")]
    InvalidBoundary,

    #[error("Username cannot contain consecutive dots (..)")]
    ConsecutiveDots,

    #[error("'{0}' is a reserved username")]
    Reserved(String),
}

impl From<UserNameError> for AuthError {
    fn from(err: UserNameError) -> Self {
        AuthError::validation("username", err.to_string())
    }
}

// ============================================================================
// UserName Value Object
// ============================================================================

/// Validated, normalized user name
///
/// - `original`: trimmed, NFKC normalized, case preserved
/// - `canonical`: lowercase form used for uniqueness and lookup
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName {
    original: String,
    canonical: String,
}

impl UserName {
    pub fn new(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let original = normalize(input.as_ref());
        let canonical = original.to_lowercase();
        validate(&canonical)?;
        Ok(Self {
            original,
            canonical,
        })
    }

    /// Create from database values (assumed already validated)
    pub fn from_db(original: &str) -> Self {
        Self {
            original: original.to_string(),
            canonical: original.to_lowercase(),
        }
    }

    #[inline]
    pub fn original(&self) -> &str {
        &self.original
    }

    #[inline]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Lowercase lookup key for a login identifier, without validation
    pub fn lookup_key(input: &str) -> String {
        normalize(input).to_lowercase()
    }
}

fn normalize(input: &str) -> String {
    input.nfkc().collect::<String>().trim().to_string()
}

fn validate(canonical: &str) -> Result<(), UserNameError> {
    if canonical.is_empty() {
        return Err(UserNameError::Empty);
    }

    let length = canonical.chars().count();
    if length < USER_NAME_MIN_LENGTH {
        return Err(UserNameError::TooShort {
            length,
            min: USER_NAME_MIN_LENGTH,
        });
    }
    if length > USER_NAME_MAX_LENGTH {
        return Err(UserNameError::TooLong {
            length,
            max: USER_NAME_MAX_LENGTH,
        });
    }

    if let Some((position, ch)) = canonical.chars().enumerate().find(|(_, c)| !is_valid_char(*c)) {
        return Err(UserNameError::InvalidCharacter { ch, position });
    }

    let boundary_ok = canonical.chars().next().is_some_and(is_valid_boundary_char)
        && canonical.chars().next_back().is_some_and(is_valid_boundary_char);
    if !boundary_ok {
        return Err(UserNameError::InvalidBoundary);
    }

    if canonical.contains("..") {
        return Err(UserNameError::ConsecutiveDots);
    }

    if RESERVED_WORDS.contains(&canonical) {
        return Err(UserNameError::Reserved(canonical.to_string()));
    }

    Ok(())
}

#[inline]
fn is_valid_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || ALLOWED_SPECIAL_CHARS.contains(&c)
}

#[inline]
fn is_valid_boundary_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.original
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserName({})", self.original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_user_names() {
        assert!(UserName::new("abc").is_ok());
        assert!(UserName::new("qari_01").is_ok());
        assert!(UserName::new("al.fatiha").is_ok());
        assert!(UserName::new("_reader-7").is_ok());
    }

    #[test]
    fn test_case_is_preserved_but_canonical_is_lower() {
        let name = UserName::new("  AbdulBasit ").unwrap();
        assert_eq!(name.original(), "AbdulBasit");
        assert_eq!(name.canonical(), "abdulbasit");
    }

    #[test]
    fn test_nfkc_fullwidth_input() {
        let name = UserName::new("ａｂｃ").unwrap();
        assert_eq!(name.canonical(), "abc");
    }

    #[test]
    fn test_length_bounds() {
        assert!(matches!(UserName::new("ab"), Err(UserNameError::TooShort { .. })));
        assert!(matches!(
            UserName::new("a".repeat(31)),
            Err(UserNameError::TooLong { .. })
        ));
    }

    #[test]
    fn test_invalid_characters() {
        assert!(matches!(
            UserName::new("a@bc"),
            Err(UserNameError::InvalidCharacter { ch: '@', position: 1 })
        ));
        assert!(matches!(
            UserName::new("a bc"),
            Err(UserNameError::InvalidCharacter { ch: ' ', .. })
        ));
        assert_eq!(UserName::new(".abc").unwrap_err(), UserNameError::InvalidBoundary);
        assert_eq!(UserName::new("abc-").unwrap_err(), UserNameError::InvalidBoundary);
        assert_eq!(UserName::new("a..bc").unwrap_err(), UserNameError::ConsecutiveDots);
    }

    #[test]
    fn test_reserved() {
        assert!(matches!(UserName::new("Admin"), Err(UserNameError::Reserved(_))));
    }

    #[test]
    fn test_error_maps_to_username_field() {
        let err: AuthError = UserName::new("x").unwrap_err().into();
        assert!(matches!(err, AuthError::Validation { field: "username", .. }));
    }
}
