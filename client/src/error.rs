use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("Request failed with status code {}", .status.as_u16())]
    Backend {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid API base URL '{0}': expected an absolute http(s) URL")]
    InvalidBaseUrl(String),
}

impl ClientError {
    /// Text shown to the user: the backend's `detail` when it sent one,
    /// otherwise the error's own description.
    pub fn display_message(&self) -> String {
        match self {
            ClientError::Backend {
                detail: Some(detail),
                ..
            } => detail.clone(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Backend { status, .. } => Some(*status),
            ClientError::Http(err) => err.status(),
            _ => None,
        }
    }
}
