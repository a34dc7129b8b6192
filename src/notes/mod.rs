//! Notes module
//!
//! Capture and retrieval of notes, each owned either by a single user or
//! by an organization, with background semantic embeddings.

pub mod models;
pub mod service;

pub use models::{CreateNoteRequest, Note, OwnerScope};
pub use service::{NoteService, ServiceError};
