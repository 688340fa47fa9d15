//! Xqueue Grader
//!
//! A pull grader for an xqueue-style submission queue.
//!
//! Architecture:
//! - Configuration: Load settings from environment variables
//! - Repository: Queue service access (login, length, pop, push)
//! - Service: Grading logic (reference grader)
//! - Scheduler: Polling loop
//!
//! The grader runs a single-threaded loop: log in, look at the queue, pull at
//! most one submission, grade it, post the result, sleep. Ctrl-C stops the
//! loop between cycles.

mod config;
mod repository;
mod scheduler;
mod service;

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::repository::HttpSubmissionRepository;
use crate::scheduler::QueuePoller;
use crate::service::ReferenceGrader;
use xqueue_client::QueueClient;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xqueue_grader=info,xqueue_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting xqueue grader");

    // Load configuration
    let config = load_config()?;
    info!(
        "Loaded configuration: xqueue_url={}, queue={}, user={}",
        config.xqueue_url, config.queue_name, config.username
    );

    let repository = HttpSubmissionRepository::new(QueueClient::new(config.client_config()));
    let grader = ReferenceGrader::new(config.workspace_dir.clone());
    info!("Downloading submissions into {}", grader.workspace().display());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("^C received, shutting down");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                error!("Failed to listen for Ctrl-C: {}", e);
                // Keep the sender alive so the poller does not read this as a shutdown.
                std::future::pending::<()>().await;
            }
        }
    });

    let mut poller = QueuePoller::new(config, Box::new(repository), Arc::new(grader));

    info!("Starting polling loop");
    if let Err(e) = poller.run(shutdown_rx).await {
        error!("Poller error: {}", e);
        return Err(e);
    }

    Ok(())
}

/// Loads and validates configuration from environment variables
fn load_config() -> Result<Config> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
