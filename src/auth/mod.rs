//! Authentication and identity resolution
//!
//! Provides:
//! - JWT token encoding/decoding (`jwt` submodule)
//! - The opaque [`Identity`] token and per-request resolution (`identity`)
//! - The resolve-only Axum middleware (`middleware`)

pub mod identity;
pub mod jwt;
pub mod middleware;

pub use identity::{Identity, RequestIdentity};
pub use middleware::resolve_identity;
