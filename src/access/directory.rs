//! Organization membership oracle.
//!
//! Membership is an external capability the service depends on; the
//! [`OrgDirectory`] trait keeps the access logic testable without a real
//! membership backend. The default implementation reads the `orgs` section
//! of the config file.

use crate::auth::Identity;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

/// Answers "does this identity have access to this organization?".
///
/// Implementations must not cache answers across requests — membership can
/// change between calls, and the evaluator consults the directory on every
/// org-scoped check.
#[async_trait]
pub trait OrgDirectory: Send + Sync {
    /// Whether `identity` is a member of `org_id`.
    ///
    /// An unknown organization is simply "no access"; an `Err` is reserved
    /// for backend failures (the evaluator treats those as "no access" too).
    async fn has_access(&self, org_id: &str, identity: &Identity) -> Result<bool>;
}

/// Membership directory backed by the `orgs` config section
/// (org id → list of member identity tokens).
pub struct ConfigOrgDirectory {
    memberships: HashMap<String, HashSet<String>>,
}

impl ConfigOrgDirectory {
    pub fn new(orgs: &HashMap<String, Vec<String>>) -> Self {
        let memberships = orgs
            .iter()
            .map(|(org, members)| (org.clone(), members.iter().cloned().collect()))
            .collect();
        Self { memberships }
    }
}

#[async_trait]
impl OrgDirectory for ConfigOrgDirectory {
    async fn has_access(&self, org_id: &str, identity: &Identity) -> Result<bool> {
        Ok(self
            .memberships
            .get(org_id)
            .is_some_and(|members| members.contains(identity.as_str())))
    }
}

// ============================================================================
// Mock directory for tests
// ============================================================================

/// In-memory membership directory with seeding helpers.
///
/// `fail_all` makes every lookup return an error, for exercising the
/// oracle-failure path.
#[cfg(test)]
pub(crate) struct MockOrgDirectory {
    pub memberships: tokio::sync::RwLock<HashMap<String, HashSet<String>>>,
    pub fail_all: std::sync::atomic::AtomicBool,
}

#[cfg(test)]
impl MockOrgDirectory {
    pub fn new() -> Self {
        Self {
            memberships: tokio::sync::RwLock::new(HashMap::new()),
            fail_all: std::sync::atomic::AtomicBool::new(false),
        }
    }

    /// Add a member to an organization (builder style)
    pub async fn with_member(self, org_id: &str, identity: &Identity) -> Self {
        self.memberships
            .write()
            .await
            .entry(org_id.to_string())
            .or_default()
            .insert(identity.as_str().to_string());
        self
    }
}

#[cfg(test)]
#[async_trait]
impl OrgDirectory for MockOrgDirectory {
    async fn has_access(&self, org_id: &str, identity: &Identity) -> Result<bool> {
        if self.fail_all.load(std::sync::atomic::Ordering::SeqCst) {
            anyhow::bail!("membership backend unavailable");
        }
        Ok(self
            .memberships
            .read()
            .await
            .get(org_id)
            .is_some_and(|members| members.contains(identity.as_str())))
    }
}
