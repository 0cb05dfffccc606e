// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP server command
//!
//! The calculation store is built here, once, and lives until shutdown.

use anyhow::{Context, Result};
use axum::Router;
use clap::Args;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use emergy_core::application::{create_calculation_repository, StandardCalculationService};
use emergy_core::domain::config::CalculatorConfig;
use emergy_core::presentation::api;

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// HTTP bind address (overrides spec.network.bind_address)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// HTTP port (overrides spec.network.port)
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,
}

pub async fn execute(args: ServeArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut config =
        CalculatorConfig::load_or_default(config_path).context("Failed to load configuration")?;

    if let Some(host) = args.host {
        config.spec.network.bind_address = host;
    }
    if let Some(port) = args.port {
        config.spec.network.port = port;
    }

    config
        .validate()
        .context("Configuration validation failed")?;

    let app = build_app(&config);
    let addr = format!(
        "{}:{}",
        config.spec.network.bind_address, config.spec.network.port
    );

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind HTTP server to {}", addr))?;

    info!(
        instance = %config.metadata.name,
        backend = ?config.spec.storage.backend,
        "Emergy calculator listening on http://{}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("HTTP server stopped");
    Ok(())
}

/// Wire repository, service and router from configuration.
pub fn build_app(config: &CalculatorConfig) -> Router {
    let repository = create_calculation_repository(&config.spec.storage.backend);
    let service = Arc::new(StandardCalculationService::new(repository));
    api::app(service, config.spec.ingestion.max_upload_bytes)
}

/// Resolves on Ctrl-C or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = wait_for_signal("Ctrl+C", signal::ctrl_c());

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}

/// A listener that fails to install never resolves, so the server keeps
/// running instead of shutting down straight after bind.
async fn wait_for_signal<F>(name: &str, listener: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = listener.await {
        error!("Failed to listen for {} signal: {}", name, e);
        std::future::pending::<()>().await;
    }
}
