//! Casegen Orchestrator
//!
//! HTTP service that turns feature descriptions into structured test cases.
//!
//! Architecture:
//! - Configuration: Load settings from environment or defaults
//! - Store: Key-value persistence (PostgreSQL, or in memory without `DATABASE_URL`)
//! - Repository: Job records on top of the store
//! - Services: Job lifecycle, background generation and export
//! - API: axum routes over the services

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod config;
pub mod db;
pub mod repository;
pub mod service;
pub mod store;

use crate::config::Config;
use crate::service::{JobService, JobSettings};
use crate::store::{KvStore, MemoryStore, PgStore};
use casegen_client::GenerationClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "casegen_orchestrator=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Casegen Orchestrator...");

    let config = load_config()?;
    info!(
        "Loaded configuration: generation_url={}, job_timeout={:?}, generation_timeout={:?}, retention_limit={}",
        config.generation_url, config.job_timeout, config.generation_timeout, config.retention_limit
    );

    let store = open_store(&config).await?;

    let mut generator = GenerationClient::new(&config.generation_url, config.generation_timeout);
    if let Some(api_key) = &config.generation_api_key {
        generator = generator.with_api_key(api_key);
    }

    let service = JobService::new(store, Arc::new(generator), JobSettings::from(&config));

    // Build router with all API endpoints
    let app = api::create_router(service);

    info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}

/// Loads and validates configuration from environment variables
fn load_config() -> Result<Config> {
    let config = Config::from_env().context("Failed to read configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Connects the job store selected by the configuration
async fn open_store(config: &Config) -> Result<Arc<dyn KvStore>> {
    match &config.database_url {
        Some(database_url) => {
            info!("Connecting to database...");

            let pool = db::create_pool(database_url)
                .await
                .context("Failed to create database pool")?;

            info!("Database connection pool created");

            db::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;

            Ok(Arc::new(PgStore::new(pool)))
        }
        None => {
            warn!("DATABASE_URL not set, jobs are kept in memory only");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
