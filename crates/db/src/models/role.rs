//! Role entity model and the well-known role ids.

use annotate_core::roles::{ROLE_ADMIN, ROLE_ANNOTATOR};
use annotate_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A role row from the `roles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Seeded roles. Discriminants match the insertion order in the lookup
/// table migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Admin = 1,
    Annotator = 2,
}

impl UserRole {
    pub fn id(self) -> DbId {
        self as DbId
    }

    pub fn from_id(id: DbId) -> Option<Self> {
        match id {
            1 => Some(Self::Admin),
            2 => Some(Self::Annotator),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::Annotator => ROLE_ANNOTATOR,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            ROLE_ADMIN => Some(Self::Admin),
            ROLE_ANNOTATOR => Some(Self::Annotator),
            _ => None,
        }
    }
}

/// Role name for a raw role id, `"unknown"` when unseeded.
pub fn role_name(role_id: DbId) -> &'static str {
    UserRole::from_id(role_id).map_or("unknown", UserRole::name)
}
