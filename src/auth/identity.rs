//! Caller identity resolved from request context.
//!
//! An [`Identity`] is the opaque stable token that personal note ownership
//! and organization membership are keyed on. It is derived from the JWT
//! `sub` claim and never interpreted beyond equality comparison.

use super::jwt::{Claims, ANONYMOUS_USER_ID};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque stable identity token for an authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The anonymous identity used when auth is not configured.
    pub fn anonymous() -> Self {
        Self(ANONYMOUS_USER_ID.to_string())
    }

    /// Derive the identity token from decoded JWT claims.
    pub fn from_claims(claims: &Claims) -> Self {
        Self(claims.sub.clone())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// Per-request resolution result, inserted into request extensions by the
/// identity middleware. `None` means the caller is unauthenticated; the
/// service layer decides what that means for each operation (reads swallow
/// it, mutations reject it).
#[derive(Debug, Clone)]
pub struct RequestIdentity(pub Option<Identity>);

impl RequestIdentity {
    pub fn authenticated(identity: Identity) -> Self {
        Self(Some(identity))
    }

    pub fn unauthenticated() -> Self {
        Self(None)
    }

    pub fn as_ref(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_equality_is_token_equality() {
        let a = Identity::from("user|123");
        let b = Identity::from("user|123");
        let c = Identity::from("user|456");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_identity_from_claims_uses_sub() {
        let claims = Claims {
            sub: "https://issuer.example|abc123".to_string(),
            email: "dora@example.com".to_string(),
            name: "Dora".to_string(),
            iat: 0,
            exp: i64::MAX,
        };
        let identity = Identity::from_claims(&claims);
        assert_eq!(identity.as_str(), "https://issuer.example|abc123");
    }

    #[test]
    fn test_anonymous_identity_matches_anonymous_claims() {
        let from_claims = Identity::from_claims(&Claims::anonymous());
        assert_eq!(from_claims, Identity::anonymous());
    }

    #[test]
    fn test_identity_serializes_as_bare_string() {
        let identity = Identity::from("tok-1");
        let json = serde_json::to_string(&identity).unwrap();
        assert_eq!(json, r#""tok-1""#);

        let back: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, identity);
    }
}
