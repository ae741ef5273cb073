use crate::commands::{Command, HELP};
use crate::render;
use anyhow::{Context, Result};
use docqa_client::{
    ClientError, Controller, DocumentApi, HealthStatus, QueryAnswer, SelectedFile, Ticket,
    UploadResult,
};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// A finished request, sent back to the event loop by the task that ran it.
pub enum Completion {
    Health(Ticket, Result<HealthStatus, ClientError>),
    Documents(Ticket, Result<Vec<String>, ClientError>),
    Upload(Ticket, Result<UploadResult, ClientError>),
    Query(Ticket, Result<QueryAnswer, ClientError>),
    Clear(Ticket, Result<String, ClientError>),
}

/// Interactive terminal front end.
///
/// Requests run as spawned tasks so input keeps being read while they are
/// pending; their results come back over a channel and are applied to the
/// controller from the single event loop.
pub struct Session<A> {
    controller: Controller<A>,
    completions: UnboundedSender<Completion>,
    receiver: Option<UnboundedReceiver<Completion>>,
}

impl<A: DocumentApi + 'static> Session<A> {
    pub fn new(controller: Controller<A>) -> Self {
        let (completions, receiver) = mpsc::unbounded_channel();
        Self {
            controller,
            completions,
            receiver: Some(receiver),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut receiver = self
            .receiver
            .take()
            .context("Session is already running")?;

        println!("{}", render::TITLE);
        println!("Type /help for commands.\n");

        self.spawn_health();
        self.spawn_documents();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read input")? else {
                        break;
                    };
                    match Command::parse(&line) {
                        Ok(Command::Quit) => break,
                        Ok(command) => self.dispatch(command),
                        Err(err) => println!("{}", err),
                    }
                }
                Some(completion) = receiver.recv() => self.apply(completion),
            }
        }

        log::info!("Session ended");
        Ok(())
    }

    fn dispatch(&mut self, command: Command) {
        match command {
            Command::Ask(question) => {
                self.controller.set_question(question);
                self.spawn_query();
            }
            Command::SelectFile(path) => self.select_file(path),
            Command::Upload => self.spawn_upload(),
            Command::Documents => self.spawn_documents(),
            Command::Health => self.spawn_health(),
            Command::Clear => self.spawn_clear(),
            Command::Status => println!("{}", render::render_state(self.controller.state())),
            Command::Help => println!("{}", HELP),
            Command::Quit => {}
        }
    }

    fn select_file(&mut self, path: PathBuf) {
        if !path.is_file() {
            println!("No such file: {}", path.display());
            return;
        }

        self.controller.select_file(Some(SelectedFile::from_path(path)));
        let state = self.controller.state();
        match (&state.selected_file, render::render_notice(state)) {
            (Some(file), _) => {
                println!("Selected {}  [{}]", file.file_name(), render::upload_label(state));
            }
            (None, Some(notice)) => println!("{}", notice),
            (None, None) => {}
        }
    }

    fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Health(ticket, result) => {
                if self.controller.finish_health(ticket, result) {
                    let health = self.controller.state().health.as_ref();
                    println!("Backend: {}", render::health_badge(health));
                }
            }
            Completion::Documents(ticket, result) => {
                if self.controller.finish_documents(ticket, result) {
                    println!("{}", render::render_documents(&self.controller.state().documents));
                }
            }
            Completion::Upload(ticket, result) => {
                let refresh = self.controller.finish_upload(ticket, result);
                self.print_notice();
                if refresh {
                    self.spawn_documents();
                }
            }
            Completion::Query(ticket, result) => {
                if self.controller.finish_query(ticket, result) {
                    println!("{}\n", render::render_answer(&self.controller.state().answer));
                }
            }
            Completion::Clear(ticket, result) => {
                let refresh = self.controller.finish_clear(ticket, result);
                self.print_notice();
                if refresh {
                    self.spawn_documents();
                }
            }
        }
    }

    fn print_notice(&self) {
        if let Some(notice) = render::render_notice(self.controller.state()) {
            println!("{}", notice);
        }
    }

    fn spawn_health(&mut self) {
        let ticket = self.controller.begin_health();
        let api = self.controller.api();
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = api.check_health().await;
            let _ = completions.send(Completion::Health(ticket, result));
        });
    }

    fn spawn_documents(&mut self) {
        let ticket = self.controller.begin_documents();
        let api = self.controller.api();
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = api.list_documents().await;
            let _ = completions.send(Completion::Documents(ticket, result));
        });
    }

    fn spawn_upload(&mut self) {
        let Some((ticket, file)) = self.controller.begin_upload() else {
            if self.controller.state().uploading {
                println!("An upload is already in progress.");
            } else {
                self.print_notice();
            }
            return;
        };

        println!("{} {}", render::upload_label(self.controller.state()), file.file_name());
        let api = self.controller.api();
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = api.upload_document(&file).await;
            let _ = completions.send(Completion::Upload(ticket, result));
        });
    }

    fn spawn_query(&mut self) {
        let Some((ticket, question)) = self.controller.begin_query() else {
            let state = self.controller.state();
            if state.querying {
                println!("Still answering the previous question.");
            } else {
                println!("{}", state.answer);
            }
            return;
        };

        println!("{}", render::ask_label(self.controller.state()));
        let api = self.controller.api();
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = api.query_documents(&question).await;
            let _ = completions.send(Completion::Query(ticket, result));
        });
    }

    fn spawn_clear(&mut self) {
        let Some(ticket) = self.controller.begin_clear() else {
            println!("{}", render::clear_refusal(self.controller.state()));
            return;
        };

        let api = self.controller.api();
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = api.clear_documents().await;
            let _ = completions.send(Completion::Clear(ticket, result));
        });
    }
}
