use docqa_client::{ApiClient, ClientConfig, DocumentApi};

// Talks to a running backend: `cargo run --example smoke -- "your question"`
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    println!("🔍 Testing backend at {}", config.api_base());
    let client = ApiClient::new(config);

    println!("\n📋 Health Check:");
    let health = client.check_health().await?;
    println!("Status: {}", health.status);
    println!("Response: {}", serde_json::to_string_pretty(&health)?);

    println!("\n📚 Documents:");
    for doc in client.list_documents().await? {
        println!("  - {}", doc);
    }

    if let Some(question) = std::env::args().nth(1) {
        println!("\n🔍 Query: {}", question);
        match client.query_documents(&question).await {
            Ok(answer) => println!("{}", answer.answer),
            Err(err) => println!("Error: {}", err.display_message()),
        }
    }

    println!("\n✅ Smoke test completed!");
    Ok(())
}
