//! Pure domain logic for the annotation platform.
//!
//! Nothing in this crate touches the database or the network, so every
//! algorithm here is unit tested in isolation and reused by the repository
//! and API layers.

pub mod activity;
pub mod assignment;
pub mod credentials;
pub mod error;
pub mod export;
pub mod ingest;
pub mod pagination;
pub mod progress;
pub mod roles;
pub mod statistics;
pub mod types;
