//! HTTP API for the note service

pub mod handlers;
pub mod note_handlers;
pub mod routes;

pub use routes::create_router;
