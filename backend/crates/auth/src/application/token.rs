//! Token Service
//!
//! Stateless signed tokens (JWT, HS256) carrying a fixed, versioned claim
//! schema. Verification needs only the shared secret and the token itself.
//!
//! `verify` returns `None` for every failure (bad signature, expired,
//! malformed, wrong schema version, wrong kind) so callers cannot tell
//! why a token was refused.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::{session::Session, user::User};
use crate::domain::value_object::{user_id::UserId, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// Current claim schema. Tokens carrying any other value are refused.
pub const CLAIMS_VERSION: u16 = 1;

/// Minimum HS256 secret length in bytes
pub const MIN_SECRET_LENGTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Cookie session token
    Session,
    /// Longer-lived token handed to programmatic clients
    Refresh,
}

/// Identity embedded by value in a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaim {
    pub user_id: UserId,
    pub email: String,
    pub username: String,
    pub role: UserRole,
}

impl From<&User> for IdentityClaim {
    fn from(user: &User) -> Self {
        IdentityClaim {
            user_id: user.user_id,
            email: user.email.as_str().to_string(),
            username: user.user_name.original().to_string(),
            role: user.user_role,
        }
    }
}

impl From<IdentityClaim> for Session {
    fn from(claim: IdentityClaim) -> Self {
        Session {
            user_id: claim.user_id,
            email: claim.email,
            username: claim.username,
            role: claim.role,
        }
    }
}

impl From<&Session> for IdentityClaim {
    fn from(session: &Session) -> Self {
        IdentityClaim {
            user_id: session.user_id,
            email: session.email.clone(),
            username: session.username.clone(),
            role: session.role,
        }
    }
}

/// Wire form of the claims
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    ver: u16,
    sub: String,
    email: String,
    username: String,
    role: UserRole,
    typ: TokenKind,
    iat: i64,
    exp: i64,
}

/// Token issued to a client
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in_secs: i64,
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &[u8]) -> AuthResult<Self> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(AuthError::Configuration(format!(
                "token secret must be at least {MIN_SECRET_LENGTH} bytes"
            )));
        }

        // Explicit algorithm, no clock-skew grace
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    pub fn issue(
        &self,
        claim: &IdentityClaim,
        kind: TokenKind,
        ttl: Duration,
    ) -> AuthResult<IssuedToken> {
        let now = Utc::now();
        let claims = Claims {
            ver: CLAIMS_VERSION,
            sub: claim.user_id.to_string(),
            email: claim.email.clone(),
            username: claim.username.clone(),
            role: claim.role,
            typ: kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("token encoding failed: {e}")))?;

        Ok(IssuedToken {
            token,
            expires_in_secs: ttl.num_seconds(),
        })
    }

    /// Verify signature, expiry, schema version and kind.
    pub fn verify(&self, token: &str, accepted: &[TokenKind]) -> Option<IdentityClaim> {
        let data = match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!(reason = ?e.kind(), "Token rejected");
                return None;
            }
        };
        let claims = data.claims;

        if claims.ver != CLAIMS_VERSION || !accepted.contains(&claims.typ) {
            tracing::debug!(ver = claims.ver, typ = ?claims.typ, "Token rejected");
            return None;
        }

        let user_id = Uuid::parse_str(&claims.sub).ok().map(UserId::from_uuid)?;

        Some(IdentityClaim {
            user_id,
            email: claims.email,
            username: claims.username,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";
    const OTHER_SECRET: &[u8] = b"fedcba9876543210fedcba9876543210";

    fn claim() -> IdentityClaim {
        IdentityClaim {
            user_id: UserId::new(),
            email: "a@x.com".to_string(),
            username: "abc".to_string(),
            role: UserRole::Moderator,
        }
    }

    fn raw_token(claims: &Claims, secret: &[u8]) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    fn raw_claims(claim: &IdentityClaim) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            ver: CLAIMS_VERSION,
            sub: claim.user_id.to_string(),
            email: claim.email.clone(),
            username: claim.username.clone(),
            role: claim.role,
            typ: TokenKind::Session,
            iat: now,
            exp: now + 3600,
        }
    }

    #[test]
    fn test_short_secret_is_configuration_error() {
        assert!(matches!(
            TokenService::new(b""),
            Err(AuthError::Configuration(_))
        ));
        assert!(matches!(
            TokenService::new(b"too-short"),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn test_issue_and_verify() {
        let service = TokenService::new(SECRET).unwrap();
        let claim = claim();
        let issued = service
            .issue(&claim, TokenKind::Session, Duration::days(1))
            .unwrap();

        assert_eq!(issued.expires_in_secs, 86_400);
        assert_eq!(
            service.verify(&issued.token, &[TokenKind::Session]),
            Some(claim)
        );
    }

    #[test]
    fn test_expired_token_is_none() {
        let service = TokenService::new(SECRET).unwrap();
        let issued = service
            .issue(&claim(), TokenKind::Session, Duration::seconds(-5))
            .unwrap();
        assert_eq!(service.verify(&issued.token, &[TokenKind::Session]), None);
    }

    #[test]
    fn test_other_secret_is_none() {
        let issuer = TokenService::new(SECRET).unwrap();
        let verifier = TokenService::new(OTHER_SECRET).unwrap();
        let issued = issuer
            .issue(&claim(), TokenKind::Session, Duration::days(1))
            .unwrap();
        assert_eq!(verifier.verify(&issued.token, &[TokenKind::Session]), None);
    }

    #[test]
    fn test_malformed_token_is_none() {
        let service = TokenService::new(SECRET).unwrap();
        assert_eq!(service.verify("", &[TokenKind::Session]), None);
        assert_eq!(service.verify("a.b.c", &[TokenKind::Session]), None);
        assert_eq!(service.verify("not-a-token", &[TokenKind::Session]), None);
    }

    #[test]
    fn test_tampered_payload_is_none() {
        let service = TokenService::new(SECRET).unwrap();
        let issued = service
            .issue(&claim(), TokenKind::Session, Duration::days(1))
            .unwrap();
        let mut parts: Vec<&str> = issued.token.split('.').collect();
        let forged_claims = Claims {
            role: UserRole::Admin,
            ..raw_claims(&claim())
        };
        let forged = raw_token(&forged_claims, OTHER_SECRET);
        let forged_payload = forged.split('.').nth(1).unwrap().to_string();
        parts[1] = &forged_payload;
        assert_eq!(service.verify(&parts.join("."), &[TokenKind::Session]), None);
    }

    #[test]
    fn test_kind_is_enforced() {
        let service = TokenService::new(SECRET).unwrap();
        let refresh = service
            .issue(&claim(), TokenKind::Refresh, Duration::days(7))
            .unwrap();
        assert_eq!(service.verify(&refresh.token, &[TokenKind::Session]), None);
        assert!(
            service
                .verify(&refresh.token, &[TokenKind::Session, TokenKind::Refresh])
                .is_some()
        );
    }

    #[test]
    fn test_other_schema_version_is_none() {
        let service = TokenService::new(SECRET).unwrap();
        let claims = Claims {
            ver: CLAIMS_VERSION + 1,
            ..raw_claims(&claim())
        };
        let token = raw_token(&claims, SECRET);
        assert_eq!(service.verify(&token, &[TokenKind::Session]), None);
    }

    #[test]
    fn test_non_uuid_subject_is_none() {
        let service = TokenService::new(SECRET).unwrap();
        let claims = Claims {
            sub: "42".to_string(),
            ..raw_claims(&claim())
        };
        let token = raw_token(&claims, SECRET);
        assert_eq!(service.verify(&token, &[TokenKind::Session]), None);
    }
}
