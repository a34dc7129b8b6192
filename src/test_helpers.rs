//! Test helper factories and mock state builders
//!
//! Builds fully wired `ServerState` instances over in-memory mocks so router
//! and middleware tests never touch Neo4j or the embedding endpoint.
#![allow(dead_code)]

use crate::access::directory::MockOrgDirectory;
use crate::access::AccessEvaluator;
use crate::api::handlers::{NotesState, ServerState};
use crate::embeddings::{EmbeddingScheduler, MockEmbeddingProvider};
use crate::neo4j::mock::MockNoteStore;
use crate::neo4j::NoteStore;
use crate::notes::NoteService;
use crate::AuthConfig;
use std::sync::Arc;

pub(crate) const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-chars!!";

pub(crate) fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_expiry_secs: 28800,
        allowed_email_domain: None,
    }
}

/// Create a mock server state with empty in-memory backends
pub(crate) async fn mock_server_state(auth_config: Option<AuthConfig>) -> NotesState {
    mock_server_state_from(
        auth_config,
        Arc::new(MockNoteStore::new()),
        Arc::new(MockOrgDirectory::new()),
    )
    .await
}

/// Create a mock server state over pre-seeded backends
pub(crate) async fn mock_server_state_from(
    auth_config: Option<AuthConfig>,
    store: Arc<MockNoteStore>,
    directory: Arc<MockOrgDirectory>,
) -> NotesState {
    let store: Arc<dyn NoteStore> = store;
    let provider = Arc::new(MockEmbeddingProvider::new(8));
    let scheduler = EmbeddingScheduler::start(store.clone(), provider);
    let service = Arc::new(NoteService::new(
        store.clone(),
        AccessEvaluator::new(directory),
        scheduler,
    ));

    Arc::new(ServerState {
        service,
        store,
        auth_config,
    })
}
