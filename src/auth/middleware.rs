//! Identity-resolving middleware for Axum routes.
//!
//! Unlike a gatekeeping middleware, this one never rejects a request: it
//! resolves the caller to `Some(Identity)` or `None` and injects the result
//! into request extensions as [`RequestIdentity`]. The service layer applies
//! the actual policy — read operations swallow a missing identity into empty
//! results, mutating operations reject it. Rejecting here with 401 would leak
//! note existence on the read paths.

use crate::api::handlers::NotesState;
use crate::auth::identity::{Identity, RequestIdentity};
use crate::auth::jwt::decode_jwt;
use crate::AuthConfig;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

/// Resolve the caller identity for a request.
///
/// # Behavior
/// 1. No auth section configured → anonymous identity (single-user mode)
/// 2. Missing or non-Bearer Authorization header → unauthenticated
/// 3. Invalid/expired JWT → unauthenticated
/// 4. `allowed_email_domain` mismatch → unauthenticated
pub async fn resolve_identity(
    State(state): State<NotesState>,
    mut req: Request,
    next: Next,
) -> Response {
    let resolved = resolve(state.auth_config.as_ref(), req.headers());
    req.extensions_mut().insert(resolved);
    next.run(req).await
}

fn resolve(auth_config: Option<&AuthConfig>, headers: &HeaderMap) -> RequestIdentity {
    let auth_config = match auth_config {
        Some(c) => c,
        // No-auth mode: every caller is the anonymous user
        None => return RequestIdentity::authenticated(Identity::anonymous()),
    };

    let token = match headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        Some(t) => t,
        None => return RequestIdentity::unauthenticated(),
    };

    let claims = match decode_jwt(token, &auth_config.jwt_secret) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            return RequestIdentity::unauthenticated();
        }
    };

    if let Some(ref domain) = auth_config.allowed_email_domain {
        if !claims.email.ends_with(&format!("@{}", domain)) {
            tracing::debug!(email = %claims.email, "Token email outside allowed domain");
            return RequestIdentity::unauthenticated();
        }
    }

    RequestIdentity::authenticated(Identity::from_claims(&claims))
}

// ============================================================================
// Tests
// ============================================================================
