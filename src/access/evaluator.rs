//! Access decisions for notes.

use crate::access::directory::OrgDirectory;
use crate::auth::Identity;
use crate::notes::models::{Note, OwnerScope};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("{reason}")]
    Denied { reason: String },
}

/// Evaluates whether a caller may see or act on a note.
///
/// Personal notes admit exactly their owner. Organization notes are
/// settled by asking the [`OrgDirectory`] on every call — membership is
/// never cached here, so a revocation takes effect on the next request.
/// A directory failure counts as "no access".
#[derive(Clone)]
pub struct AccessEvaluator {
    directory: Arc<dyn OrgDirectory>,
}

impl AccessEvaluator {
    pub fn new(directory: Arc<dyn OrgDirectory>) -> Self {
        Self { directory }
    }

    /// Whether `identity` may act within `org_id`. Unauthenticated callers
    /// never have organization access.
    pub async fn can_access_organization(
        &self,
        org_id: &str,
        identity: Option<&Identity>,
    ) -> bool {
        let Some(identity) = identity else {
            return false;
        };
        match self.directory.has_access(org_id, identity).await {
            Ok(allowed) => allowed,
            Err(e) => {
                tracing::warn!(
                    org_id = %org_id,
                    error = %e,
                    "Organization membership check failed, denying access"
                );
                false
            }
        }
    }

    /// Whether `identity` may see `note`.
    pub async fn can_access_note(&self, note: &Note, identity: Option<&Identity>) -> bool {
        match &note.owner {
            OwnerScope::Personal { identity: owner } => identity == Some(owner),
            OwnerScope::Organization { org_id } => {
                self.can_access_organization(org_id, identity).await
            }
        }
    }

    /// Like `can_access_note`, but fails with `denial_reason` when access
    /// is not granted. Used on mutating paths where a denial must be
    /// reported rather than hidden.
    pub async fn assert_note_access(
        &self,
        note: &Note,
        identity: Option<&Identity>,
        denial_reason: &str,
    ) -> Result<(), AccessError> {
        if self.can_access_note(note, identity).await {
            Ok(())
        } else {
            Err(AccessError::Denied {
                reason: denial_reason.to_string(),
            })
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
