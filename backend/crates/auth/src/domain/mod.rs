//! Domain Layer
//!
//! Contains entities, value objects, repository traits and the pure
//! access-control decision.

pub mod access;
pub mod entity;
pub mod mailer;
pub mod repository;
pub mod value_object;

// Re-exports
pub use access::{GateDecision, RouteAccess, Transport};
pub use entity::{reset_token::ResetToken, session::Session, user::User};
pub use mailer::ResetMailer;
pub use repository::{AuthStore, ResetTokenRepository, UserRepository};
