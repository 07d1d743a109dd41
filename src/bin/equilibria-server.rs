// ABOUTME: HTTP server binary for the Equilibria API
// ABOUTME: Loads configuration, opens the database and serves /api/v1 until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Equilibria API Server Binary
//!
//! Starts the REST API with bearer authentication and `SQLite` storage.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use equilibria_server::{
    config::{DatabaseUrl, ServerConfig},
    constants::endpoints,
    database::Database,
    logging::LoggingConfig,
    resources::ServerResources,
    routes::build_router,
};
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "equilibria-server")]
#[command(about = "Equilibria API - recovery-focused fitness tracking backend")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL (sqlite:path or sqlite::memory:)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(url) = args.database_url.as_deref() {
        config.database.url = DatabaseUrl::parse_url(url)?;
    }
    config.validate()?;

    let mut logging = LoggingConfig::from_env();
    logging.level = config.log_level.to_string();
    logging.environment = config.environment.to_string();
    logging.init()?;

    info!("Starting Equilibria API");
    info!("{}", config.summary());

    let database = Database::new(&config.database.url)
        .await
        .context("Failed to open database")?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.http_port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.host, config.http_port))?;

    let resources = Arc::new(ServerResources::new(database, Arc::new(config)));
    let app = build_router(resources);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(
        "Listening on http://{addr} (API under {}, health at {})",
        endpoints::API_V1,
        endpoints::HEALTH_CHECK
    );

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {e}");
        return Err(e.into());
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}
