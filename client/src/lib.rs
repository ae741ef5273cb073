pub mod api_client;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod selected_file;

pub use models::*;
pub use api_client::{ApiClient, DocumentApi};
pub use config::ClientConfig;
pub use controller::{AppState, Controller, Notice, NoticeKind, Operation, Ticket};
pub use error::ClientError;
pub use selected_file::{SelectedFile, PDF_MEDIA_TYPE};
