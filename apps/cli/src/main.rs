//! CLI binary: runs one sync cycle against the configured Notion database.

use std::env;
use std::time::Instant;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use choreboard_core::run_cycle;
use choreboard_notion::NotionClient;

/// Read one required environment variable.
fn required_env(name: &str) -> anyhow::Result<String> {
    env::var(name).with_context(|| format!("{name} is not set"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let api_key = required_env("NOTION_API_KEY")?;
    let database_id = required_env("NOTION_DATABASE_ID")?;
    let client = NotionClient::new(api_key, database_id);

    let started = Instant::now();
    let summary = run_cycle(&client).await?;
    info!(
        "cycle finished in {} ms: {} rows, {} completed, {} activated, {} update failures",
        started.elapsed().as_millis(),
        summary.rows,
        summary.completed,
        summary.activated,
        summary.update_failures,
    );

    Ok(())
}
