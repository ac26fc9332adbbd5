//! Entity Module

pub mod reset_token;
pub mod session;
pub mod user;
