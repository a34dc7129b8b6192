//! API request handlers: shared server state, health check, error mapping

use crate::neo4j::NoteStore;
use crate::notes::{NoteService, ServiceError};
use crate::AuthConfig;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

/// Shared server state
pub struct ServerState {
    pub service: Arc<NoteService>,
    pub store: Arc<dyn NoteStore>,
    /// Auth config — None means the server runs without authentication and
    /// every request is treated as the anonymous local identity.
    pub auth_config: Option<AuthConfig>,
}

/// Shared notes state
pub type NotesState = Arc<ServerState>;

// ============================================================================
// Health check
// ============================================================================

/// Per-service health status in the health response
#[derive(Serialize)]
pub struct ServiceHealthStatus {
    pub neo4j: String,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<ServiceHealthStatus>,
}

/// Health check handler — verifies actual connectivity to Neo4j.
///
/// Returns:
/// - 200 + `"ok"` if Neo4j is connected
/// - 503 + `"unhealthy"` if Neo4j is disconnected (critical dependency)
pub async fn health(State(state): State<NotesState>) -> (StatusCode, Json<HealthResponse>) {
    let neo4j_ok = state.store.ping().await.is_ok();

    let (http_status, status) = if neo4j_ok {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        http_status,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            services: Some(ServiceHealthStatus {
                neo4j: if neo4j_ok {
                    "connected".to_string()
                } else {
                    "disconnected".to_string()
                },
            }),
        }),
    )
}

// ============================================================================
// Error handling
// ============================================================================

/// Application error type
#[derive(Debug)]
pub enum AppError {
    Internal(anyhow::Error),
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthenticated { reason } => AppError::Unauthorized(reason),
            ServiceError::Denied { reason } => AppError::Forbidden(reason),
            ServiceError::NotFound => AppError::NotFound("Note not found".to_string()),
            ServiceError::Store(e) => AppError::Internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn error_parts(err: AppError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_response_shape() {
        let (status, json) = error_parts(AppError::NotFound("Note not found".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Note not found");
    }

    #[tokio::test]
    async fn test_internal_error_hides_status_in_body() {
        let (status, json) =
            error_parts(AppError::Internal(anyhow::anyhow!("connection reset"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "connection reset");
    }

    #[tokio::test]
    async fn test_bad_request_response_shape() {
        let (status, json) = error_parts(AppError::BadRequest("no such shape".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "no such shape");
    }

    #[test]
    fn test_service_error_mapping() {
        let err: AppError = ServiceError::Unauthenticated {
            reason: "You must be logged in to create a note".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let err: AppError = ServiceError::Denied {
            reason: "You do not have permission to delete this note".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err: AppError = ServiceError::NotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));

        let err: AppError = ServiceError::Store(anyhow::anyhow!("boom")).into();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_health_response_omits_services_when_none() {
        let resp = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
            services: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("services").is_none());
    }
}
