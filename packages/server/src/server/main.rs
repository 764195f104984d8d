// Main entry point: HTTP server, one-shot scrape, or travel assistant REPL.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crawler::{BrowserCrawler, ContentFetcher, HttpLoader, ScrapePipeline};
use llm_client::LlmClient;
use server_core::domains::memory::{PgDocumentStore, PreferenceStore};
use server_core::domains::travel::TravelAgent;
use server_core::kernel::ServerDeps;
use server_core::server::build_app;
use server_core::Config;

#[derive(Parser)]
#[command(name = "server", about = "EU AI Act compliance scanner")]
struct Cli {
    /// "serve" to run the HTTP API, "chat" for the travel assistant REPL,
    /// or a URL to scrape once
    target: String,

    /// Output path for one-shot scrape mode
    output_json: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.target.as_str() {
        "serve" => serve().await,
        "chat" => chat().await,
        url => {
            let output = cli
                .output_json
                .as_deref()
                .unwrap_or("scraped_data.json");
            scrape_once(url, output).await
        }
    }
}

fn build_pipeline() -> Result<Arc<ScrapePipeline>> {
    Ok(Arc::new(ScrapePipeline::new(
        Arc::new(BrowserCrawler::new()),
        ContentFetcher::new(Arc::new(HttpLoader::new()?)),
    )))
}

/// One-shot mode: scrape a site and write the pages to a JSON file.
async fn scrape_once(url: &str, output: &str) -> Result<()> {
    let pipeline = build_pipeline()?;
    let pages = pipeline.scrape(url).await?;

    let payload =
        serde_json::to_string_pretty(&pages).context("Failed to serialize scraped pages")?;
    tokio::fs::write(output, payload)
        .await
        .with_context(|| format!("Failed to write {output}"))?;

    println!("Scraped data saved to {output}");
    Ok(())
}

async fn build_deps(config: &Config) -> Result<Arc<ServerDeps>> {
    tracing::info!("Connecting to document store...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to document store")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Document store ready");

    let store = Arc::new(PgDocumentStore::new(pool));
    let llm = Arc::new(LlmClient::new(&config.llm_api_key).with_base_url(&config.llm_base_url));

    Ok(Arc::new(ServerDeps::new(
        store,
        llm,
        config.llm_model.clone(),
        build_pipeline()?,
    )))
}

/// HTTP server mode.
async fn serve() -> Result<()> {
    tracing::info!("Starting compliance scanner API");

    let config = Config::from_env().context("Failed to load configuration")?;
    let deps = build_deps(&config).await?;
    let app = build_app(deps);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Interactive travel assistant REPL.
async fn chat() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let deps = build_deps(&config).await?;

    let user_id = std::env::var("CHAT_USER_ID").unwrap_or_else(|_| "Bruce".to_string());
    let agent = TravelAgent::new(
        deps.llm.clone(),
        deps.llm_model.clone(),
        PreferenceStore::new(deps.store.clone()),
    );

    println!("--- Starting Interactive Travel Assistant ---");
    println!("Type 'quit' to end the session.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\n> ");
        std::io::stdout().flush().ok();

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if matches!(query.to_lowercase().as_str(), "quit" | "exit") {
            println!("Ending session. Goodbye!");
            break;
        }

        match agent.chat(&user_id, query).await {
            Ok(reply) => println!("<<< Assistant: {reply}"),
            Err(e) => eprintln!("Error: {e:#}"),
        }
    }

    Ok(())
}
