use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    #[serde(alias = "unhealthy")]
    Error,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HealthState::Healthy => "healthy",
            HealthState::Error => "error",
            HealthState::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Body of `GET /health`. Fields the client does not model are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: HealthState,
    #[serde(default, alias = "error", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, alias = "documents_stored", skip_serializing_if = "Option::is_none")]
    pub document_count: Option<u64>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl HealthStatus {
    pub fn new(status: HealthState) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// Status recorded when the health check itself could not be completed.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: HealthState::Error,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthState::Healthy
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(alias = "chunks_created")]
    pub chunks_added: u64,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueryRequest {
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryAnswer {
    pub answer: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClearResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub detail: Option<Value>,
}

/// Outcome of reading the `documents` field of a `GET /documents` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentListing {
    Listed(Vec<String>),
    /// The body has no usable `documents` array, as with the older
    /// `{total_chunks, collection_name}` payload.
    NotPresent,
}

impl DocumentListing {
    pub fn parse(body: &Value) -> Self {
        match body.get("documents").cloned().map(serde_json::from_value::<Vec<String>>) {
            Some(Ok(documents)) => DocumentListing::Listed(documents),
            _ => DocumentListing::NotPresent,
        }
    }

    pub fn into_documents(self) -> Vec<String> {
        match self {
            DocumentListing::Listed(documents) => documents,
            DocumentListing::NotPresent => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn health_accepts_backend_spellings() {
        let status: HealthStatus = serde_json::from_value(json!({
            "status": "unhealthy",
            "error": "qdrant unreachable",
            "qdrant_connected": false
        }))
        .unwrap();

        assert_eq!(status.status, HealthState::Error);
        assert_eq!(status.message.as_deref(), Some("qdrant unreachable"));
        assert_eq!(status.extra.get("qdrant_connected"), Some(&json!(false)));

        let body = json!({"status": "initializing", "documents_stored": 0});
        let status: HealthStatus = serde_json::from_value(body).unwrap();
        assert_eq!(status.status, HealthState::Unknown);
        assert_eq!(status.document_count, Some(0));
    }

    #[test]
    fn health_without_status_is_unknown() {
        let status: HealthStatus = serde_json::from_value(json!({})).unwrap();
        assert_eq!(status.status, HealthState::Unknown);
        assert!(!status.is_healthy());
    }

    #[test]
    fn upload_result_accepts_chunks_created() {
        let result: UploadResult = serde_json::from_value(json!({
            "success": true,
            "chunks_created": 3,
            "filename": "a.pdf",
            "message": "Successfully processed a.pdf"
        }))
        .unwrap();

        assert_eq!(result.chunks_added, 3);
        assert_eq!(result.filename, "a.pdf");
    }

    #[test]
    fn document_listing_distinguishes_missing_field() {
        let listed = DocumentListing::parse(&json!({"documents": ["a.pdf", "b.pdf"]}));
        assert_eq!(listed, DocumentListing::Listed(vec!["a.pdf".into(), "b.pdf".into()]));

        let legacy = DocumentListing::parse(&json!({
            "total_chunks": 4,
            "collection_name": "pdf_documents"
        }));
        assert_eq!(legacy, DocumentListing::NotPresent);

        let wrong_shape = DocumentListing::parse(&json!({"documents": 3}));
        assert!(wrong_shape.into_documents().is_empty());

        assert_eq!(DocumentListing::parse(&Value::Null), DocumentListing::NotPresent);
    }
}
