//! Row models and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row, plus the create/update DTOs and aggregate rows its repository needs.

pub mod activity;
pub mod annotation;
pub mod class;
pub mod dataset;
pub mod progress_marker;
pub mod role;
pub mod status;
pub mod task;
pub mod text_pair;
pub mod user;
