// CLI entry point for the research team

use std::sync::Arc;

use anyhow::{Context, Result};
use gemini_client::{Content, GeminiClient};
use research_team::{create_coordinator, Config, FirecrawlScraper, TavilySearcher};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,research_team=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; missing keys abort startup
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    let client = GeminiClient::new(config.google_api_key.expose());
    let searcher = Arc::new(TavilySearcher::new(config.tavily_api_key.expose()));
    let scraper = Arc::new(
        FirecrawlScraper::new(config.firecrawl_api_key.expose())
            .context("Failed to create scrape client")?,
    );

    let coordinator = create_coordinator(&client, &config, searcher, scraper);

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(
            format!(
                "Research team ready (coordinator: {}). Enter a request, or 'quit' to exit.\n",
                config.coordinator_model
            )
            .as_bytes(),
        )
        .await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut history: Vec<Content> = Vec::new();

    loop {
        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let request = line.trim();
        if request.is_empty() {
            continue;
        }
        if request.eq_ignore_ascii_case("quit") || request.eq_ignore_ascii_case("exit") {
            break;
        }

        history.push(Content::user_text(request));

        match coordinator.chat_with_history(history.clone()).await {
            Ok(response) => {
                tracing::debug!(
                    iterations = response.iterations,
                    tool_calls = ?response.tool_calls_made,
                    "Coordinator turn complete"
                );
                history.push(Content::model(vec![gemini_client::Part::text(
                    response.content.as_str(),
                )]));
                stdout
                    .write_all(format!("\n{}\n", response.content).as_bytes())
                    .await?;
            }
            Err(e) => {
                tracing::error!(error = %e, "Coordinator request failed");
                // Drop the failed turn so a retry starts clean
                history.pop();
                stdout
                    .write_all(format!("\nRequest failed: {}\n", e).as_bytes())
                    .await?;
            }
        }
    }

    stdout.write_all(b"Goodbye.\n").await?;
    Ok(())
}
