//! Semantic Notes
//!
//! A multi-tenant note service with:
//! - Neo4j persistence with per-owner and per-organization indexes
//! - Background embedding generation via a HuggingFace-style endpoint
//! - JWT identity resolution with an anonymous single-user mode
//! - Organization membership checks on every access

pub mod access;
pub mod api;
pub mod auth;
pub mod embeddings;
pub mod neo4j;
pub mod notes;

#[cfg(test)]
pub(crate) mod test_helpers;

use anyhow::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: ServerYamlConfig,
    pub neo4j: Neo4jYamlConfig,
    pub embedding: EmbeddingYamlConfig,
    /// Organization membership directory: org id → member identity tokens
    pub orgs: HashMap<String, Vec<String>>,
    /// Auth section — if absent, auth_config will be None (anonymous local mode)
    pub auth: Option<AuthConfig>,
}

/// Server configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerYamlConfig {
    pub port: u16,
}

impl Default for ServerYamlConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Neo4j configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Neo4jYamlConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl Default for Neo4jYamlConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".into(),
            user: "neo4j".into(),
            password: "notes123".into(),
        }
    }
}

/// Embedding provider configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingYamlConfig {
    /// Feature-extraction endpoint URL
    pub url: String,
    pub model: String,
    pub dimensions: usize,
    /// Bearer token for the embedding endpoint (e.g. a HuggingFace API key)
    pub api_key: Option<String>,
}

impl Default for EmbeddingYamlConfig {
    fn default() -> Self {
        Self {
            url: "https://router.huggingface.co/hf-inference/models/mixedbread-ai/mxbai-embed-large-v1/pipeline/feature-extraction".into(),
            model: "mixedbread-ai/mxbai-embed-large-v1".into(),
            dimensions: 1024,
            api_key: None,
        }
    }
}

/// Authentication configuration.
///
/// Two modes depending on whether the section is present:
/// - **No-auth**: no `auth` section in YAML → `auth_config = None` → every
///   request runs as the anonymous local identity (single-user mode)
/// - **JWT**: `auth` present → requests carry an HS256 Bearer token; requests
///   without a valid one are unauthenticated (reads scope away, writes fail)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// JWT signing secret (HS256, minimum 32 characters)
    pub jwt_secret: String,
    /// JWT token lifetime in seconds (default: 28800 = 8h)
    #[serde(default = "default_jwt_expiry")]
    pub jwt_expiry_secs: u64,
    /// Optional domain restriction (e.g. "example.com")
    pub allowed_email_domain: Option<String>,
}

fn default_jwt_expiry() -> u64 {
    28800 // 8 hours
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    pub embedding_url: String,
    pub embedding_model: String,
    pub embedding_dimensions: usize,
    pub embedding_api_key: Option<String>,
    /// Organization membership directory: org id → member identity tokens
    pub orgs: HashMap<String, Vec<String>>,
    /// Auth config — None means anonymous local mode (no auth section in YAML)
    pub auth_config: Option<AuthConfig>,
}

impl Config {
    /// Load configuration from environment variables only.
    /// Equivalent to from_yaml_and_env(None).
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. If the file doesn't
    /// exist, falls back to pure env var / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        Ok(Self {
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.server.port),
            neo4j_uri: std::env::var("NEO4J_URI").unwrap_or(yaml.neo4j.uri),
            neo4j_user: std::env::var("NEO4J_USER").unwrap_or(yaml.neo4j.user),
            neo4j_password: std::env::var("NEO4J_PASSWORD").unwrap_or(yaml.neo4j.password),
            embedding_url: std::env::var("EMBEDDING_URL").unwrap_or(yaml.embedding.url),
            embedding_model: std::env::var("EMBEDDING_MODEL").unwrap_or(yaml.embedding.model),
            embedding_dimensions: std::env::var("EMBEDDING_DIMENSIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.embedding.dimensions),
            embedding_api_key: std::env::var("EMBEDDING_API_KEY")
                .ok()
                .or(yaml.embedding.api_key),
            orgs: yaml.orgs,
            auth_config: yaml.auth,
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

// ============================================================================
// Server bootstrap
// ============================================================================

/// Connect to the store, start the embedding worker, and serve the API.
pub async fn start_server(config: Config) -> Result<()> {
    let store: Arc<dyn neo4j::NoteStore> = Arc::new(
        neo4j::Neo4jClient::new(
            &config.neo4j_uri,
            &config.neo4j_user,
            &config.neo4j_password,
            config.embedding_dimensions,
        )
        .await?,
    );
    tracing::info!("Connected to Neo4j at {}", config.neo4j_uri);

    let provider: Arc<dyn embeddings::EmbeddingProvider> =
        Arc::new(embeddings::HttpEmbeddingProvider::new(
            config.embedding_url.clone(),
            config.embedding_model.clone(),
            config.embedding_api_key.clone(),
            config.embedding_dimensions,
        ));

    let scheduler = embeddings::EmbeddingScheduler::start(store.clone(), provider);
    match scheduler.recover().await {
        Ok(0) => {}
        Ok(n) => tracing::info!("Re-queued {} notes missing an embedding", n),
        Err(e) => tracing::warn!("Embedding recovery failed: {}", e),
    }

    let directory: Arc<dyn access::OrgDirectory> =
        Arc::new(access::ConfigOrgDirectory::new(&config.orgs));
    let service = Arc::new(notes::NoteService::new(
        store.clone(),
        access::AccessEvaluator::new(directory),
        scheduler,
    ));

    let state: api::handlers::NotesState = Arc::new(api::handlers::ServerState {
        service,
        store,
        auth_config: config.auth_config.clone(),
    });

    let app = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
