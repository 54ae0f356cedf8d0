//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`denylist`] -- In-memory set of revoked token ids.

pub mod denylist;
pub mod jwt;
pub mod password;
