//! Access control for notes
//!
//! Architecture follows the project pattern (trait + impl + mock):
//! - `OrgDirectory` trait: async interface for organization membership
//! - `ConfigOrgDirectory`: real implementation backed by configuration
//! - `MockOrgDirectory`: seedable mock for tests
//!
//! The `AccessEvaluator` sits on top and turns membership answers into
//! per-note access decisions.

pub mod directory;
pub mod evaluator;

pub use directory::{ConfigOrgDirectory, OrgDirectory};
pub use evaluator::{AccessError, AccessEvaluator};
