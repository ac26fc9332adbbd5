//! Password Reset Token Entity
//!
//! Only the SHA-256 digest of the token is persisted. The raw value
//! exists in memory long enough to hand to the mailer.

use chrono::{DateTime, Duration, Utc};
use platform::crypto::{random_token, token_digest};

use crate::domain::value_object::user_id::UserId;

/// Random bytes per reset token (256 bits)
const RESET_TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone)]
pub struct ResetToken {
    /// base64url SHA-256 of the raw token, primary key
    pub token_hash: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ResetToken {
    /// Mint a fresh token. Returns the raw value alongside the record.
    pub fn issue(user_id: UserId, ttl: Duration) -> (String, Self) {
        let raw = random_token(RESET_TOKEN_BYTES);
        let now = Utc::now();

        let record = Self {
            token_hash: token_digest(&raw),
            user_id,
            expires_at: now + ttl,
            created_at: now,
        };

        (raw, record)
    }

    /// Storage key for a presented token
    pub fn hash_of(raw: &str) -> String {
        token_digest(raw)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_stores_digest_only() {
        let (raw, record) = ResetToken::issue(UserId::new(), Duration::hours(1));
        assert_ne!(raw, record.token_hash);
        assert_eq!(ResetToken::hash_of(&raw), record.token_hash);
    }

    #[test]
    fn test_expiry() {
        let (_, record) = ResetToken::issue(UserId::new(), Duration::hours(1));
        assert!(!record.is_expired());
        assert!(record.is_expired_at(record.expires_at));
        assert!(record.is_expired_at(record.created_at + Duration::minutes(61)));
    }

    #[test]
    fn test_tokens_are_unique() {
        let (a, _) = ResetToken::issue(UserId::new(), Duration::hours(1));
        let (b, _) = ResetToken::issue(UserId::new(), Duration::hours(1));
        assert_ne!(a, b);
    }
}
