//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use extract::{ValidJson, ValidPath};
pub use handlers::AuthAppState;
pub use middleware::{AccessGate, CurrentSession, access_gate};
pub use router::{auth_router, auth_router_generic, page_gate};
