use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::models::*;
use crate::selected_file::SelectedFile;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const HEALTH_PATH: &str = "health";
pub const UPLOAD_PATH: &str = "upload-pdf";
pub const QUERY_PATH: &str = "query";
pub const DOCUMENTS_PATH: &str = "documents";

/// Operations the backend exposes to this client.
///
/// Each call is a single attempt: no caching, no retry.
#[async_trait]
pub trait DocumentApi: Send + Sync {
    async fn check_health(&self) -> Result<HealthStatus, ClientError>;

    async fn upload_document(&self, file: &SelectedFile) -> Result<UploadResult, ClientError>;

    async fn query_documents(&self, question: &str) -> Result<QueryAnswer, ClientError>;

    /// Filenames known to the backend. Bodies without a `documents` array
    /// yield an empty list.
    async fn list_documents(&self) -> Result<Vec<String>, ClientError>;

    /// Removes every stored document and returns the backend's confirmation.
    async fn clear_documents(&self) -> Result<String, ClientError>;
}

pub struct ApiClient {
    client: Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = extract_detail(&body);
            log::warn!(
                "Backend responded with {}: {}",
                status,
                detail.as_deref().unwrap_or("no detail")
            );
            return Err(ClientError::Backend { status, detail });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl DocumentApi for ApiClient {
    async fn check_health(&self) -> Result<HealthStatus, ClientError> {
        let response = self
            .client
            .get(self.config.endpoint(HEALTH_PATH))
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn upload_document(&self, file: &SelectedFile) -> Result<UploadResult, ClientError> {
        let bytes = tokio::fs::read(file.path())
            .await
            .map_err(|source| ClientError::Io {
                path: file.path().to_path_buf(),
                source,
            })?;

        log::info!("Uploading {} ({} bytes)", file.file_name(), bytes.len());

        let part = Part::bytes(bytes)
            .file_name(file.file_name().to_string())
            .mime_str(file.media_type())?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.config.endpoint(UPLOAD_PATH))
            .multipart(form)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn query_documents(&self, question: &str) -> Result<QueryAnswer, ClientError> {
        let request = QueryRequest {
            question: question.to_string(),
        };

        let response = self
            .client
            .post(self.config.endpoint(QUERY_PATH))
            .json(&request)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn list_documents(&self) -> Result<Vec<String>, ClientError> {
        let response = self
            .client
            .get(self.config.endpoint(DOCUMENTS_PATH))
            .send()
            .await?;

        let body: Value = Self::decode(response).await?;
        match DocumentListing::parse(&body) {
            DocumentListing::Listed(documents) => Ok(documents),
            DocumentListing::NotPresent => {
                log::debug!("Document list response has no documents array; treating as empty");
                Ok(Vec::new())
            }
        }
    }

    async fn clear_documents(&self) -> Result<String, ClientError> {
        let response = self
            .client
            .delete(self.config.endpoint(DOCUMENTS_PATH))
            .send()
            .await?;

        let cleared: ClearResponse = Self::decode(response).await?;
        Ok(cleared
            .message
            .unwrap_or_else(|| "All documents cleared".to_string()))
    }
}

/// Pulls the human-readable `detail` out of an error body. Structured details,
/// such as validation error lists, come back as compact JSON.
fn extract_detail(body: &str) -> Option<String> {
    let parsed: ErrorResponse = serde_json::from_str(body).ok()?;

    match parsed.detail? {
        Value::Null => None,
        Value::String(detail) => Some(detail),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_detail_reads_string_detail() {
        assert_eq!(
            extract_detail(r#"{"detail": "Only PDF files are allowed"}"#).as_deref(),
            Some("Only PDF files are allowed")
        );
    }

    #[test]
    fn extract_detail_serializes_structured_detail() {
        let body = r#"{"detail": [{"loc": ["body", "question"], "msg": "field required"}]}"#;
        let detail = extract_detail(body).unwrap();
        assert!(detail.contains("field required"));
    }

    #[test]
    fn extract_detail_ignores_other_bodies() {
        assert_eq!(extract_detail("Internal Server Error"), None);
        assert_eq!(extract_detail(r#"{"error": "boom"}"#), None);
        assert_eq!(extract_detail(r#"{"detail": null}"#), None);
    }
}
