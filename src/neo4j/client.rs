//! Neo4j client for note persistence

use crate::auth::Identity;
use crate::neo4j::traits::NoteStore;
use crate::notes::models::{Note, OwnerScope};
use anyhow::{Context, Result};
use async_trait::async_trait;
use neo4rs::{query, Graph};
use std::sync::Arc;
use uuid::Uuid;

/// Client for Neo4j note operations
pub struct Neo4jClient {
    graph: Arc<Graph>,
    embedding_dimensions: usize,
}

impl Neo4jClient {
    /// Create a new Neo4j client
    pub async fn new(
        uri: &str,
        user: &str,
        password: &str,
        embedding_dimensions: usize,
    ) -> Result<Self> {
        let graph = Graph::new(uri, user, password)
            .await
            .context("Failed to connect to Neo4j")?;

        let client = Self {
            graph: Arc::new(graph),
            embedding_dimensions,
        };

        // Initialize schema
        client.init_schema().await?;

        Ok(client)
    }

    /// Initialize the graph schema with constraints and indexes
    async fn init_schema(&self) -> Result<()> {
        let constraints = vec![
            "CREATE CONSTRAINT note_id IF NOT EXISTS FOR (n:Note) REQUIRE n.id IS UNIQUE",
        ];

        let indexes = vec![
            "CREATE INDEX note_owner IF NOT EXISTS FOR (n:Note) ON (n.owner_identity)",
            "CREATE INDEX note_org IF NOT EXISTS FOR (n:Note) ON (n.org_id)",
        ];

        // Vector index (requires Neo4j 5.13+ — gracefully skip if not supported)
        let vector_index = format!(
            r#"CREATE VECTOR INDEX note_embeddings IF NOT EXISTS
               FOR (n:Note) ON (n.embedding)
               OPTIONS {{indexConfig: {{
                   `vector.dimensions`: {},
                   `vector.similarity_function`: 'cosine'
               }}}}"#,
            self.embedding_dimensions
        );

        for constraint in constraints {
            if let Err(e) = self.graph.run(query(constraint)).await {
                tracing::warn!("Constraint may already exist: {}", e);
            }
        }

        for index in indexes {
            if let Err(e) = self.graph.run(query(index)).await {
                tracing::warn!("Index may already exist: {}", e);
            }
        }

        // Vector index — optional, don't fail startup if Neo4j doesn't support it
        if let Err(e) = self.graph.run(query(&vector_index)).await {
            tracing::warn!(
                "Vector index creation skipped (Neo4j may not support vector indexes): {}",
                e
            );
        }

        Ok(())
    }

    // Helper function to convert note owner to type string
    fn owner_type_string(&self, owner: &OwnerScope) -> String {
        match owner {
            OwnerScope::Personal { .. } => "personal".to_string(),
            OwnerScope::Organization { .. } => "organization".to_string(),
        }
    }

    // Helper function to extract the owning identity (empty for org notes)
    fn owner_identity_string(&self, owner: &OwnerScope) -> String {
        match owner {
            OwnerScope::Personal { identity } => identity.as_str().to_string(),
            OwnerScope::Organization { .. } => String::new(),
        }
    }

    // Helper function to extract the owning org id (empty for personal notes)
    fn org_id_string(&self, owner: &OwnerScope) -> String {
        match owner {
            OwnerScope::Personal { .. } => String::new(),
            OwnerScope::Organization { org_id } => org_id.clone(),
        }
    }

    // Helper function to convert Neo4j node to Note
    fn node_to_note(&self, node: &neo4rs::Node) -> Result<Note> {
        let owner_type: String = node
            .get("owner_type")
            .unwrap_or_else(|_| "personal".to_string());

        let owner = match owner_type.as_str() {
            "organization" => OwnerScope::Organization {
                org_id: node.get("org_id")?,
            },
            _ => OwnerScope::Personal {
                identity: Identity::new(node.get::<String>("owner_identity")?),
            },
        };

        let embedding: Option<Vec<f32>> = node
            .get::<Vec<f64>>("embedding")
            .ok()
            .map(|v| v.iter().map(|&x| x as f32).collect());

        Ok(Note {
            id: node.get::<String>("id")?.parse()?,
            text: node.get("text")?,
            owner,
            embedding,
            created_at: node
                .get::<String>("created_at")?
                .parse()
                .unwrap_or_else(|_| chrono::Utc::now()),
        })
    }
}

#[async_trait]
impl NoteStore for Neo4jClient {
    async fn insert_note(&self, note: &Note) -> Result<()> {
        // created_at is stored as an RFC3339 string: fixed-width UTC
        // timestamps sort chronologically under the string ORDER BY below.
        let q = query(
            r#"
            CREATE (n:Note {
                id: $id,
                text: $text,
                owner_type: $owner_type,
                owner_identity: $owner_identity,
                org_id: $org_id,
                created_at: $created_at
            })
            "#,
        )
        .param("id", note.id.to_string())
        .param("text", note.text.clone())
        .param("owner_type", self.owner_type_string(&note.owner))
        .param("owner_identity", self.owner_identity_string(&note.owner))
        .param("org_id", self.org_id_string(&note.owner))
        .param("created_at", note.created_at.to_rfc3339());

        self.graph.run(q).await?;

        Ok(())
    }

    async fn get_note(&self, id: Uuid) -> Result<Option<Note>> {
        let q = query(
            r#"
            MATCH (n:Note {id: $id})
            RETURN n
            "#,
        )
        .param("id", id.to_string());

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("n")?;
            Ok(Some(self.node_to_note(&node)?))
        } else {
            Ok(None)
        }
    }

    async fn list_notes_by_owner(&self, identity: &Identity) -> Result<Vec<Note>> {
        let q = query(
            r#"
            MATCH (n:Note {owner_type: 'personal', owner_identity: $identity})
            RETURN n
            ORDER BY n.created_at DESC
            "#,
        )
        .param("identity", identity.as_str().to_string());

        let mut result = self.graph.execute(q).await?;
        let mut notes = Vec::new();
        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("n")?;
            notes.push(self.node_to_note(&node)?);
        }

        Ok(notes)
    }

    async fn list_notes_by_org(&self, org_id: &str) -> Result<Vec<Note>> {
        let q = query(
            r#"
            MATCH (n:Note {owner_type: 'organization', org_id: $org_id})
            RETURN n
            "#,
        )
        .param("org_id", org_id.to_string());

        let mut result = self.graph.execute(q).await?;
        let mut notes = Vec::new();
        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("n")?;
            notes.push(self.node_to_note(&node)?);
        }

        Ok(notes)
    }

    /// Store a vector embedding on a Note node.
    ///
    /// Uses `db.create.setNodeVectorProperty` to ensure the correct type
    /// for the HNSW vector index. Also stores the model name for traceability.
    /// If the note no longer exists the MATCH binds nothing and this is a no-op.
    async fn set_note_embedding(&self, id: Uuid, embedding: &[f32], model: &str) -> Result<()> {
        // Convert f32 to f64 for neo4rs compatibility
        let embedding_f64: Vec<f64> = embedding.iter().map(|&x| x as f64).collect();

        let q = query(
            r#"
            MATCH (n:Note {id: $id})
            CALL db.create.setNodeVectorProperty(n, 'embedding', $embedding)
            SET n.embedding_model = $model,
                n.embedded_at = datetime()
            "#,
        )
        .param("id", id.to_string())
        .param("embedding", embedding_f64)
        .param("model", model.to_string());

        self.graph
            .run(q)
            .await
            .context(format!("Failed to set embedding on note {}", id))?;

        Ok(())
    }

    async fn delete_note(&self, id: Uuid) -> Result<bool> {
        let q = query(
            r#"
            MATCH (n:Note {id: $id})
            DETACH DELETE n
            RETURN count(n) AS deleted
            "#,
        )
        .param("id", id.to_string());

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let deleted: i64 = row.get("deleted")?;
            Ok(deleted > 0)
        } else {
            Ok(false)
        }
    }

    async fn list_notes_missing_embedding(&self) -> Result<Vec<Note>> {
        let q = query(
            r#"
            MATCH (n:Note)
            WHERE n.embedding IS NULL
            RETURN n
            ORDER BY n.created_at
            "#,
        );

        let mut result = self.graph.execute(q).await?;
        let mut notes = Vec::new();
        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("n")?;
            notes.push(self.node_to_note(&node)?);
        }

        Ok(notes)
    }

    async fn ping(&self) -> Result<()> {
        self.graph
            .run(query("RETURN 1"))
            .await
            .context("Neo4j connectivity check failed")?;
        Ok(())
    }
}
