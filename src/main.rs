//! Semantic Notes - Main Server
//!
//! A multi-tenant note service with Neo4j persistence and background
//! embedding generation.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use semantic_notes::auth::jwt::encode_jwt;
use semantic_notes::embeddings::{backfill_embeddings, HttpEmbeddingProvider};
use semantic_notes::neo4j::{Neo4jClient, NoteStore};
use semantic_notes::Config;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "semantic-notes")]
#[command(about = "Semantic note service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the note server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Embed every stored note that is missing an embedding, then exit
    BackfillEmbeddings,

    /// Mint a JWT for local use (requires an auth section in config)
    MintToken {
        /// Subject user id (random if omitted)
        #[arg(long)]
        user: Option<Uuid>,

        /// Email claim
        #[arg(long, default_value = "dev@localhost")]
        email: String,

        /// Display name claim
        #[arg(long, default_value = "Local Dev")]
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,semantic_notes=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_env()?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server_port = port;
            }
            semantic_notes::start_server(config).await
        }
        Commands::BackfillEmbeddings => run_backfill(config).await,
        Commands::MintToken { user, email, name } => run_mint_token(config, user, &email, &name),
    }
}

async fn run_backfill(config: Config) -> Result<()> {
    let store: Arc<dyn NoteStore> = Arc::new(
        Neo4jClient::new(
            &config.neo4j_uri,
            &config.neo4j_user,
            &config.neo4j_password,
            config.embedding_dimensions,
        )
        .await?,
    );
    tracing::info!("Connected to Neo4j at {}", config.neo4j_uri);

    let provider = HttpEmbeddingProvider::new(
        config.embedding_url.clone(),
        config.embedding_model.clone(),
        config.embedding_api_key.clone(),
        config.embedding_dimensions,
    );

    let progress = backfill_embeddings(store.as_ref(), &provider).await?;
    tracing::info!(
        "Backfill complete: {} embedded, {} errors (of {} missing)",
        progress.processed,
        progress.errors,
        progress.total
    );

    Ok(())
}

fn run_mint_token(config: Config, user: Option<Uuid>, email: &str, name: &str) -> Result<()> {
    let auth = config
        .auth_config
        .context("No auth section in config — the server runs in anonymous mode and needs no tokens")?;

    let user_id = user.unwrap_or_else(Uuid::new_v4);
    let token = encode_jwt(user_id, email, name, &auth.jwt_secret, auth.jwt_expiry_secs)?;

    println!("{}", token);
    Ok(())
}
