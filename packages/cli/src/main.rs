// ABOUTME: Aquaflow server binary
// ABOUTME: Parses the command line, wires up state, and serves the API

use std::net::SocketAddr;

use anyhow::Context;
use axum::http::Method;
use clap::{Parser, Subcommand};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use aquaflow_api::{create_router, AppState};

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "aquaflow", version, about = "CRM backend for the water-treatment sales pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the API server (the default)
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
    }
}

async fn serve() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let pool = aquaflow_storage::connect(&config.database_path)
        .await
        .context("failed to open database")?;
    aquaflow_storage::init_schema(&pool)
        .await
        .context("failed to initialize schema")?;

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<axum::http::HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = create_router(AppState::new(pool)).layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    info!("Aquaflow listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
