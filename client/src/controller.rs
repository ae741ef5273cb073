use crate::api_client::DocumentApi;
use crate::error::ClientError;
use crate::models::*;
use crate::selected_file::SelectedFile;
use std::sync::Arc;

pub const INVALID_FILE_MESSAGE: &str = "Please select a valid PDF file";
pub const NO_FILE_MESSAGE: &str = "Please select a file first";
pub const EMPTY_QUESTION_MESSAGE: &str = "Please enter a question";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Health,
    Documents,
    Upload,
    Query,
    Clear,
}

/// Handed out when an operation enters Pending. Only the most recent ticket
/// for an operation may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    operation: Operation,
    generation: u64,
}

impl Ticket {
    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Everything the presentation layer draws.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// `None` until the first health check completes.
    pub health: Option<HealthStatus>,
    pub health_pending: bool,
    pub selected_file: Option<SelectedFile>,
    pub uploading: bool,
    pub upload_notice: Option<Notice>,
    pub question: String,
    pub answer: String,
    pub querying: bool,
    pub clearing: bool,
    pub documents: Vec<String>,
    pub documents_pending: bool,
}

impl AppState {
    pub fn can_upload(&self) -> bool {
        self.selected_file.is_some() && !self.uploading && !self.clearing
    }

    pub fn can_query(&self) -> bool {
        !self.question.trim().is_empty() && !self.querying
    }
}

#[derive(Debug, Default)]
struct Generations {
    health: u64,
    documents: u64,
    upload: u64,
    query: u64,
    clear: u64,
}

impl Generations {
    fn slot(&mut self, operation: Operation) -> &mut u64 {
        match operation {
            Operation::Health => &mut self.health,
            Operation::Documents => &mut self.documents,
            Operation::Upload => &mut self.upload,
            Operation::Query => &mut self.query,
            Operation::Clear => &mut self.clear,
        }
    }

    fn current(&self, operation: Operation) -> u64 {
        match operation {
            Operation::Health => self.health,
            Operation::Documents => self.documents,
            Operation::Upload => self.upload,
            Operation::Query => self.query,
            Operation::Clear => self.clear,
        }
    }

    fn issue(&mut self, operation: Operation) -> Ticket {
        let slot = self.slot(operation);
        *slot += 1;
        Ticket {
            operation,
            generation: *slot,
        }
    }
}

/// Owns the application state and moves each operation through
/// `Idle -> Pending -> (Success | Failed) -> Idle`.
///
/// `begin_*` checks guards, marks the operation pending and returns a ticket;
/// `finish_*` applies the outcome for that ticket. The async methods compose
/// the two around a call to the [`DocumentApi`].
pub struct Controller<A> {
    api: Arc<A>,
    state: AppState,
    generations: Generations,
}

impl<A: DocumentApi> Controller<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: AppState::default(),
            generations: Generations::default(),
        }
    }

    pub fn api(&self) -> Arc<A> {
        Arc::clone(&self.api)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.state.question = question.into();
    }

    pub fn select_file(&mut self, file: Option<SelectedFile>) {
        match file {
            Some(file) if file.is_pdf() => {
                log::debug!("Selected {}", file.file_name());
                self.state.selected_file = Some(file);
                self.state.upload_notice = None;
            }
            other => {
                if let Some(file) = other {
                    log::info!("Rejected {} ({})", file.file_name(), file.media_type());
                }
                self.state.selected_file = None;
                self.state.upload_notice = Some(Notice::warning(INVALID_FILE_MESSAGE));
            }
        }
    }

    fn accept(&self, ticket: Ticket) -> bool {
        let current = self.generations.current(ticket.operation);
        if current != ticket.generation {
            log::debug!(
                "Discarding stale {:?} result (generation {}, current {})",
                ticket.operation,
                ticket.generation,
                current
            );
            return false;
        }
        true
    }

    pub fn begin_health(&mut self) -> Ticket {
        self.state.health_pending = true;
        self.generations.issue(Operation::Health)
    }

    pub fn finish_health(
        &mut self,
        ticket: Ticket,
        result: Result<HealthStatus, ClientError>,
    ) -> bool {
        if !self.accept(ticket) {
            return false;
        }
        self.state.health_pending = false;

        let health = match result {
            Ok(health) => health,
            Err(err) => {
                log::error!("Health check failed: {}", err);
                HealthStatus::failed(err.display_message())
            }
        };
        self.state.health = Some(health);
        true
    }

    pub fn begin_documents(&mut self) -> Ticket {
        self.state.documents_pending = true;
        self.generations.issue(Operation::Documents)
    }

    pub fn finish_documents(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<String>, ClientError>,
    ) -> bool {
        if !self.accept(ticket) {
            return false;
        }
        self.state.documents_pending = false;

        match result {
            Ok(documents) => self.state.documents = documents,
            Err(err) => log::error!("Failed to load documents: {}", err),
        }
        true
    }

    /// Returns the ticket and the file to send, or `None` when a guard fails
    /// or an upload is already running.
    pub fn begin_upload(&mut self) -> Option<(Ticket, SelectedFile)> {
        if self.state.uploading || self.state.clearing {
            log::debug!("Upload refused: another document operation is pending");
            return None;
        }

        let file = match &self.state.selected_file {
            Some(file) if file.is_pdf() => file.clone(),
            Some(_) => {
                self.state.selected_file = None;
                self.state.upload_notice = Some(Notice::warning(INVALID_FILE_MESSAGE));
                return None;
            }
            None => {
                self.state.upload_notice = Some(Notice::warning(NO_FILE_MESSAGE));
                return None;
            }
        };

        self.state.uploading = true;
        self.state.upload_notice = None;
        Some((self.generations.issue(Operation::Upload), file))
    }

    /// Returns `true` when the document list should be refreshed.
    pub fn finish_upload(
        &mut self,
        ticket: Ticket,
        result: Result<UploadResult, ClientError>,
    ) -> bool {
        if !self.accept(ticket) {
            return false;
        }
        self.state.uploading = false;

        match result {
            Ok(upload) => {
                log::info!("Uploaded {} ({} chunks)", upload.filename, upload.chunks_added);
                self.state.upload_notice = Some(Notice::success(format!(
                    "Success! Uploaded {} chunks from {}",
                    upload.chunks_added, upload.filename
                )));
                self.state.selected_file = None;
                true
            }
            Err(err) => {
                log::error!("Upload failed: {}", err);
                let message = format!("Error: {}", err.display_message());
                self.state.upload_notice = Some(Notice::error(message));
                false
            }
        }
    }

    pub fn begin_query(&mut self) -> Option<(Ticket, String)> {
        if self.state.querying {
            log::debug!("Query refused: a question is already pending");
            return None;
        }
        if self.state.question.trim().is_empty() {
            self.state.answer = EMPTY_QUESTION_MESSAGE.to_string();
            return None;
        }

        self.state.querying = true;
        self.state.answer.clear();
        let ticket = self.generations.issue(Operation::Query);
        Some((ticket, self.state.question.clone()))
    }

    pub fn finish_query(
        &mut self,
        ticket: Ticket,
        result: Result<QueryAnswer, ClientError>,
    ) -> bool {
        if !self.accept(ticket) {
            return false;
        }
        self.state.querying = false;

        self.state.answer = match result {
            Ok(answer) => answer.answer,
            Err(err) => {
                log::error!("Query failed: {}", err);
                format!("Error: {}", err.display_message())
            }
        };
        true
    }

    pub fn begin_clear(&mut self) -> Option<Ticket> {
        if self.state.uploading || self.state.clearing {
            log::debug!("Clear refused: another document operation is pending");
            return None;
        }

        self.state.clearing = true;
        self.state.upload_notice = None;
        Some(self.generations.issue(Operation::Clear))
    }

    /// Returns `true` when the document list should be refreshed.
    pub fn finish_clear(&mut self, ticket: Ticket, result: Result<String, ClientError>) -> bool {
        if !self.accept(ticket) {
            return false;
        }
        self.state.clearing = false;

        match result {
            Ok(message) => {
                log::info!("{}", message);
                self.state.upload_notice = Some(Notice::success(message));
                true
            }
            Err(err) => {
                log::error!("Clearing documents failed: {}", err);
                let message = format!("Error: {}", err.display_message());
                self.state.upload_notice = Some(Notice::error(message));
                false
            }
        }
    }

    /// Initial load: health and document list, issued together.
    pub async fn mount(&mut self) {
        let health_ticket = self.begin_health();
        let documents_ticket = self.begin_documents();

        let api = self.api();
        let (health, documents) = tokio::join!(api.check_health(), api.list_documents());

        self.finish_health(health_ticket, health);
        self.finish_documents(documents_ticket, documents);
    }

    pub async fn check_health(&mut self) {
        let ticket = self.begin_health();
        let result = self.api.check_health().await;
        self.finish_health(ticket, result);
    }

    pub async fn refresh_documents(&mut self) {
        let ticket = self.begin_documents();
        let result = self.api.list_documents().await;
        self.finish_documents(ticket, result);
    }

    pub async fn upload(&mut self) {
        let Some((ticket, file)) = self.begin_upload() else {
            return;
        };

        let result = self.api.upload_document(&file).await;
        if self.finish_upload(ticket, result) {
            self.refresh_documents().await;
        }
    }

    pub async fn ask(&mut self) {
        let Some((ticket, question)) = self.begin_query() else {
            return;
        };

        let result = self.api.query_documents(&question).await;
        self.finish_query(ticket, result);
    }

    pub async fn clear_documents(&mut self) {
        let Some(ticket) = self.begin_clear() else {
            return;
        };

        let result = self.api.clear_documents().await;
        if self.finish_clear(ticket, result) {
            self.refresh_documents().await;
        }
    }
}
