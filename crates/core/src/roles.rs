//! Well-known role name constants.
//!
//! These must match the seed data in `20260301000001_create_lookup_tables.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_ANNOTATOR: &str = "annotator";
