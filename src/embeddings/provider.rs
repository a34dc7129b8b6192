//! HTTP embedding provider implementation
//!
//! Implements `EmbeddingProvider` against a feature-extraction endpoint
//! (Hugging Face Inference API, text-embeddings-inference, or anything
//! speaking the same `{"model", "inputs"}` request format).
//!
//! The response shape is not uniform across deployments: depending on the
//! model and pooling configuration the endpoint may answer with a single
//! number, a flat vector, or a matrix of per-token rows. [`ensure_vector`]
//! normalizes all three into one flat vector before anything is stored.

use super::traits::EmbeddingProvider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The embedding endpoint answered with something that cannot be read as
/// a numeric vector.
#[derive(Debug, Error)]
#[error("Malformed embedding response: {reason}")]
pub struct MalformedEmbedding {
    pub reason: String,
}

/// Normalize an embedding payload into a flat `Vec<f32>`.
///
/// Accepted shapes:
/// - a bare number (read as a one-dimensional vector)
/// - a flat array of numbers
/// - an array of numeric rows, flattened in row order
///
/// Anything else is a [`MalformedEmbedding`].
pub fn ensure_vector(value: &Value) -> Result<Vec<f32>, MalformedEmbedding> {
    match value {
        Value::Number(_) => Ok(vec![to_f32(value)?]),
        Value::Array(items) => {
            if items.iter().all(Value::is_number) {
                return items.iter().map(to_f32).collect();
            }
            if items.iter().all(Value::is_array) {
                let mut flat = Vec::new();
                for row in items {
                    if let Value::Array(cells) = row {
                        for cell in cells {
                            flat.push(to_f32(cell)?);
                        }
                    }
                }
                return Ok(flat);
            }
            Err(MalformedEmbedding {
                reason: "array elements are neither numbers nor numeric rows".to_string(),
            })
        }
        other => Err(MalformedEmbedding {
            reason: format!("expected a number or an array, found {}", json_kind(other)),
        }),
    }
}

fn to_f32(value: &Value) -> Result<f32, MalformedEmbedding> {
    value
        .as_f64()
        .map(|n| n as f32)
        .ok_or_else(|| MalformedEmbedding {
            reason: format!("expected a number, found {}", json_kind(value)),
        })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// HTTP-based embedding provider using the feature-extraction API format.
///
/// Thread-safe and cheaply cloneable (shares the reqwest client internally).
#[derive(Clone)]
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
    dimensions: usize,
}

/// Feature-extraction request
#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    inputs: String,
}

/// Error payload some deployments answer with
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

impl HttpEmbeddingProvider {
    /// Create a new HTTP embedding provider with explicit configuration.
    ///
    /// # Arguments
    ///
    /// * `url` - The feature-extraction endpoint
    /// * `model` - The model name to send with each request
    /// * `api_key` - Optional API key for authenticated endpoints
    /// * `dimensions` - Expected embedding dimensions (must match the model output)
    pub fn new(url: String, model: String, api_key: Option<String>, dimensions: usize) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            url,
            model,
            api_key,
            dimensions,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let request_body = EmbeddingRequest {
            model: self.model.clone(),
            inputs: text.to_string(),
        };

        let mut req = self.client.post(&self.url).json(&request_body);

        if let Some(ref key) = self.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }

        let response = req
            .send()
            .await
            .with_context(|| format!("Failed to connect to embedding API at {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if let Ok(err) = serde_json::from_str::<ErrorResponse>(&body) {
                if let Some(message) = err.error {
                    anyhow::bail!("Embedding API error ({}): {}", status.as_u16(), message);
                }
            }
            anyhow::bail!("Embedding API returned {} — {}", status.as_u16(), body);
        }

        // Parsed as a raw value first: the shape varies by deployment.
        let payload: Value = response
            .json()
            .await
            .context("Failed to parse embedding API response")?;

        let embedding = ensure_vector(&payload)?;

        if embedding.len() != self.dimensions {
            anyhow::bail!(
                "Embedding dimension mismatch: expected {}, got {} (model: {})",
                self.dimensions,
                embedding.len(),
                self.model
            );
        }

        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ensure_vector_scalar() {
        assert_eq!(ensure_vector(&json!(0.5)).unwrap(), vec![0.5]);
        assert_eq!(ensure_vector(&json!(3)).unwrap(), vec![3.0]);
    }

    #[test]
    fn test_ensure_vector_flat() {
        assert_eq!(
            ensure_vector(&json!([0.1, 0.2, 0.3])).unwrap(),
            vec![0.1, 0.2, 0.3]
        );
    }

    #[test]
    fn test_ensure_vector_flattens_rows_in_order() {
        assert_eq!(
            ensure_vector(&json!([[1.0, 2.0], [3.0, 4.0]])).unwrap(),
            vec![1.0, 2.0, 3.0, 4.0]
        );
    }

    #[test]
    fn test_ensure_vector_empty_array() {
        // An empty array is technically a vector; the dimension check in
        // embed_text is what rejects it.
        assert!(ensure_vector(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_ensure_vector_rejects_non_numeric() {
        assert!(ensure_vector(&json!("oops")).is_err());
        assert!(ensure_vector(&json!(null)).is_err());
        assert!(ensure_vector(&json!({"embedding": [1.0]})).is_err());
        assert!(ensure_vector(&json!(["a", "b"])).is_err());
        assert!(ensure_vector(&json!([[1.0], "b"])).is_err());
        assert!(ensure_vector(&json!([[1.0], ["b"]])).is_err());
    }

    #[test]
    fn test_new_explicit_config() {
        let provider = HttpEmbeddingProvider::new(
            "http://localhost:8080/embed".to_string(),
            "test-model".to_string(),
            Some("key-123".to_string()),
            512,
        );
        assert_eq!(provider.url, "http://localhost:8080/embed");
        assert_eq!(provider.model, "test-model");
        assert_eq!(provider.api_key, Some("key-123".to_string()));
        assert_eq!(provider.dimensions, 512);
        assert_eq!(provider.model_name(), "test-model");
        assert_eq!(provider.dimensions(), 512);
    }
}

// ============================================================================
// Integration Tests (with wiremock)
// ============================================================================

#[cfg(test)]
mod http_tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer, dimensions: usize) -> HttpEmbeddingProvider {
        HttpEmbeddingProvider::new(
            format!("{}/embed", server.uri()),
            "test-model".to_string(),
            None,
            dimensions,
        )
    }

    #[tokio::test]
    async fn test_flat_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([0.1, 0.2, 0.3])))
            .mount(&server)
            .await;

        let embedding = provider_for(&server, 3).embed_text("hi").await.unwrap();
        assert_eq!(embedding, vec![0.1, 0.2, 0.3]);
    }

    #[tokio::test]
    async fn test_scalar_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(0.42)))
            .mount(&server)
            .await;

        let embedding = provider_for(&server, 1).embed_text("hi").await.unwrap();
        assert_eq!(embedding, vec![0.42]);
    }

    #[tokio::test]
    async fn test_nested_response_is_flattened() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embed"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([[0.1, 0.2], [0.3, 0.4]])),
            )
            .mount(&server)
            .await;

        let embedding = provider_for(&server, 4).embed_text("hi").await.unwrap();
        assert_eq!(embedding, vec![0.1, 0.2, 0.3, 0.4]);
    }

    #[tokio::test]
    async fn test_non_numeric_response_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!("not a vector")))
            .mount(&server)
            .await;

        let err = provider_for(&server, 3).embed_text("hi").await.unwrap_err();
        assert!(err.downcast_ref::<MalformedEmbedding>().is_some());
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([0.1, 0.2])))
            .mount(&server)
            .await;

        let err = provider_for(&server, 768).embed_text("hi").await.unwrap_err();
        assert!(err.to_string().contains("dimension mismatch"));
    }

    #[tokio::test]
    async fn test_api_error_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embed"))
            .respond_with(
                ResponseTemplate::new(503)
                    .set_body_json(json!({"error": "model test-model is loading"})),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server, 3).embed_text("hi").await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("503"));
        assert!(message.contains("model test-model is loading"));
    }

    #[tokio::test]
    async fn test_api_key_sent_as_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embed"))
            .and(header("Authorization", "Bearer secret-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([1.0])))
            .expect(1)
            .mount(&server)
            .await;

        let provider = HttpEmbeddingProvider::new(
            format!("{}/embed", server.uri()),
            "test-model".to_string(),
            Some("secret-key".to_string()),
            1,
        );
        provider.embed_text("hi").await.unwrap();
    }
}
