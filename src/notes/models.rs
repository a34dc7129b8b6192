//! Note data model

use crate::auth::Identity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ownership scope of a note — exactly one of the two forms, chosen at
/// creation and never changed.
///
/// Modeling this as a tagged enum (rather than two nullable fields) makes
/// the "both set" and "neither set" states unrepresentable. There is no
/// unowned or public variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OwnerScope {
    /// Owned by a single user; visible only to that identity.
    Personal { identity: Identity },
    /// Owned by an organization; visible to any member.
    Organization { org_id: String },
}

impl OwnerScope {
    pub fn personal(identity: Identity) -> Self {
        Self::Personal { identity }
    }

    pub fn organization(org_id: impl Into<String>) -> Self {
        Self::Organization {
            org_id: org_id.into(),
        }
    }
}

/// A stored note.
///
/// `text` and `owner` are immutable after creation (there is no edit
/// operation). `embedding` starts absent and is patched once by the
/// background pipeline: complete-or-absent, never partial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub text: String,
    pub owner: OwnerScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Create a note without an embedding. The id is assigned here,
    /// before the note ever reaches the store.
    pub fn new(text: impl Into<String>, owner: OwnerScope) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            owner,
            embedding: None,
            created_at: Utc::now(),
        }
    }
}

/// Request to create a note.
///
/// `org_id` present → organization-scoped; absent → personally owned by
/// the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNoteRequest {
    pub text: String,
    pub org_id: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================
