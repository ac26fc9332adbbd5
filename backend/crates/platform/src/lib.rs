//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (secure random tokens, SHA-256, Base64)
//! - Credential hashing (Argon2id) and password policy
//! - Cookie building and extraction

pub mod cookie;
pub mod crypto;
pub mod password;
