//! Neo4j client and store abstraction for notes

pub mod client;
pub mod traits;

pub use client::Neo4jClient;
pub use traits::NoteStore;

#[cfg(test)]
pub(crate) mod mock;
