//! Application Configuration
//!
//! Configuration for the Auth application layer. There is no `Default`:
//! a config always carries an explicit signing secret.

use std::fmt;

use chrono::Duration;
use platform::cookie::CookieConfig;
use platform::crypto::{from_base64, random_bytes};
use platform::password::CredentialHasher;
use zeroize::Zeroizing;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

use crate::application::token::{MIN_SECRET_LENGTH, TokenService};
use crate::error::{AuthError, AuthResult};

pub const SESSION_COOKIE_NAME: &str = "auth_token";

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret, at least 32 bytes
    pub token_secret: Zeroizing<Vec<u8>>,
    /// Application-wide password pepper
    pub password_pepper: Option<Zeroizing<Vec<u8>>>,
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
    /// Session token (and cookie) lifetime
    pub session_ttl: Duration,
    /// Refresh-style token lifetime
    pub refresh_ttl: Duration,
    pub reset_token_ttl: Duration,
    /// Where anonymous page navigations are sent
    pub login_path: String,
    /// Where authenticated visitors of login/signup pages are sent
    pub home_path: String,
    /// Reset links are `{reset_url_base}?token=...`
    pub reset_url_base: String,
}

impl AuthConfig {
    /// Build a config around an explicit secret with the standard lifetimes
    pub fn new(token_secret: Vec<u8>) -> AuthResult<Self> {
        if token_secret.len() < MIN_SECRET_LENGTH {
            return Err(AuthError::Configuration(format!(
                "AUTH_TOKEN_SECRET must be at least {MIN_SECRET_LENGTH} bytes"
            )));
        }

        Ok(Self {
            token_secret: Zeroizing::new(token_secret),
            password_pepper: None,
            cookie_name: SESSION_COOKIE_NAME.to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            session_ttl: Duration::days(1),
            refresh_ttl: Duration::days(7),
            reset_token_ttl: Duration::hours(1),
            login_path: "/login".to_string(),
            home_path: "/".to_string(),
            reset_url_base: "http://localhost:3000/reset-password".to_string(),
        })
    }

    /// Load from process environment
    pub fn from_env() -> AuthResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup.
    ///
    /// - `AUTH_TOKEN_SECRET` (required)
    /// - `AUTH_PASSWORD_PEPPER` (optional, standard base64)
    /// - `APP_ENV` (`production` turns on the Secure cookie flag)
    /// - `AUTH_COOKIE_SECURE` (`true`/`false`, overrides `APP_ENV`)
    /// - `AUTH_RESET_URL_BASE`
    pub fn from_lookup<F>(lookup: F) -> AuthResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("AUTH_TOKEN_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AuthError::Configuration("AUTH_TOKEN_SECRET is not set".to_string()))?;

        let mut config = Self::new(secret.into_bytes())?;

        if let Some(pepper) = lookup("AUTH_PASSWORD_PEPPER").filter(|s| !s.is_empty()) {
            let bytes = from_base64(pepper.trim()).map_err(|_| {
                AuthError::Configuration("AUTH_PASSWORD_PEPPER must be base64".to_string())
            })?;
            config.password_pepper = Some(Zeroizing::new(bytes));
        }

        let production = lookup("APP_ENV").is_some_and(|env| env.eq_ignore_ascii_case("production"));
        config.cookie_secure = match lookup("AUTH_COOKIE_SECURE").as_deref().map(str::trim) {
            Some("true" | "1") => true,
            Some("false" | "0") => false,
            Some(other) => {
                return Err(AuthError::Configuration(format!(
                    "AUTH_COOKIE_SECURE must be true or false (got '{other}')"
                )));
            }
            None => production,
        };

        if let Some(base) = lookup("AUTH_RESET_URL_BASE").filter(|s| !s.trim().is_empty()) {
            config.reset_url_base = base.trim().trim_end_matches('/').to_string();
        }

        Ok(config)
    }

    /// Random in-memory secret, insecure cookie. Local development and tests.
    pub fn development() -> Self {
        Self {
            token_secret: Zeroizing::new(random_bytes(MIN_SECRET_LENGTH * 2)),
            password_pepper: None,
            cookie_name: SESSION_COOKIE_NAME.to_string(),
            cookie_secure: false,
            cookie_same_site: SameSite::Lax,
            session_ttl: Duration::days(1),
            refresh_ttl: Duration::days(7),
            reset_token_ttl: Duration::hours(1),
            login_path: "/login".to_string(),
            home_path: "/".to_string(),
            reset_url_base: "http://localhost:3000/reset-password".to_string(),
        }
    }

    /// Session cookie attributes
    pub fn cookie_config(&self) -> CookieConfig {
        CookieConfig {
            name: self.cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.session_ttl.num_seconds()),
        }
    }

    pub fn token_service(&self) -> AuthResult<TokenService> {
        TokenService::new(&self.token_secret)
    }

    pub fn credential_hasher(&self) -> AuthResult<CredentialHasher> {
        let pepper = self.password_pepper.as_ref().map(|p| p.to_vec());
        Ok(CredentialHasher::new(pepper)?)
    }

    pub fn reset_link(&self, token: &str) -> String {
        format!("{}?token={}", self.reset_url_base, token)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"[REDACTED]")
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .field("cookie_name", &self.cookie_name)
            .field("cookie_secure", &self.cookie_secure)
            .field("session_ttl", &self.session_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("reset_token_ttl", &self.reset_token_ttl)
            .field("reset_url_base", &self.reset_url_base)
            .finish_non_exhaustive()
    }
}
