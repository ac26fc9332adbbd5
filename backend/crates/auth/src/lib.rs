//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits, access decision
//! - `application/` - Use cases, token service, session resolver
//! - `infra/` - PostgreSQL and in-memory stores, reset mailer
//! - `presentation/` - HTTP handlers, DTOs, gate middleware, router
//!
//! ## Features
//! - Sign-up and login by email or user name, session cookie `auth_token`
//! - Stateless signed session tokens (JWT, HS256) with a versioned claim schema
//! - Bearer-token refresh flow for programmatic clients
//! - One-hour, single-use password reset tokens
//! - Role hierarchy `USER < MODERATOR < ADMIN` with route-level gating
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, random salt per hash, optional pepper
//! - Login and password-reset requests do not reveal whether an account exists
//! - Reset tokens stored as SHA-256 digests only
//! - Admin-only routes re-read the live role instead of trusting the token
//! - No default signing secret: a missing or short secret aborts startup

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::memory::InMemoryAuthRepository;
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::{auth_router, auth_router_generic, page_gate};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::domain::repository::AuthStore;
    pub use crate::infra::memory::InMemoryAuthRepository;
    pub use crate::infra::postgres::PgAuthRepository;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
