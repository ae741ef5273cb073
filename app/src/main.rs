mod commands;
mod render;
mod session;

use anyhow::Result;
use clap::Parser;
use docqa_client::{ApiClient, ClientConfig, Controller};
use session::Session;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "docqa", version, about = "Upload PDFs and ask questions about them")]
struct Cli {
    /// Base URL of the document QA backend, e.g. http://localhost:8000 or http://host/api
    #[arg(long, env = "DOCQA_API_BASE")]
    api_base: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment variables and logging
    dotenv::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let config = match cli.api_base.filter(|base| !base.trim().is_empty()) {
        Some(base) => ClientConfig::new(base)?,
        None => ClientConfig::from_env()?,
    };
    log::info!("Using backend at {}", config.api_base());

    let api = Arc::new(ApiClient::new(config));
    let mut session = Session::new(Controller::new(api));
    session.run().await
}
