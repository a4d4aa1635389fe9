// ABOUTME: Server binary for the Corral livestock tracking backend
// ABOUTME: Loads configuration, opens the store, and serves the JSON API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Corral

//! # Corral Server Binary
//!
//! Starts the tracking backend: environment configuration, SQLite store,
//! JWT auth, and the axum HTTP API.

use anyhow::Result;
use clap::Parser;
use corral::{
    auth::AuthManager,
    config::ServerConfig,
    database::Database,
    logging,
    routes::{self, AppState},
    services::TrackingService,
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "corral-server")]
#[command(about = "Corral - livestock geofence tracking backend")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
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
    if let Some(database_url) = args.database_url {
        config.database.url = corral::config::DatabaseUrl::parse_url(&database_url);
    }

    logging::init_from_env()?;

    info!("Starting Corral tracking backend");
    info!("{}", config.summary());

    let database = Arc::new(Database::new(&config.database.url.to_connection_string()).await?);
    info!("Database ready: {}", config.database.url);

    let auth = Arc::new(AuthManager::new(
        config.auth.jwt_secret.as_bytes(),
        config.auth.jwt_expiry_hours,
    ));
    let tracking = Arc::new(TrackingService::new(Arc::clone(&database), &config.tracking));

    let state = AppState {
        database,
        auth,
        tracking,
    };
    let app = routes::router(state);

    display_available_endpoints(&config);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.http_port)).await?;
    info!("Listening on port {}", config.http_port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install shutdown handler: {e}");
        return;
    }
    info!("shutdown signal received");
}

/// Display the API surface with its port at startup
fn display_available_endpoints(config: &ServerConfig) {
    let port = config.http_port;

    info!("=== Available API Endpoints ===");
    info!("Authentication:");
    info!("   Register:          POST http://localhost:{port}/api/auth/register");
    info!("   Login:             POST http://localhost:{port}/api/auth/login");
    info!("   Current User:      GET  http://localhost:{port}/api/auth/me");
    info!("Animals:");
    info!("   Register Collar:   POST http://localhost:{port}/api/animals");
    info!("   List Animals:      GET  http://localhost:{port}/api/animals");
    info!("   Animal Detail:     GET  http://localhost:{port}/api/animals/{{id}}");
    info!("Tracking:");
    info!("   Report Location:   POST http://localhost:{port}/api/tracking/update/{{id}}");
    info!("   Device Report:     POST http://localhost:{port}/api/tracking/report");
    info!("   History:           GET  http://localhost:{port}/api/tracking/history/{{id}}");
    info!("   Event History:     GET  http://localhost:{port}/api/tracking/events");
    info!("   Re-check Status:   GET  http://localhost:{port}/api/tracking/check/{{id}}");
    info!("   Bluetooth Sweep:   POST http://localhost:{port}/api/tracking/bluetooth");
    info!("   Simulate:          POST http://localhost:{port}/api/tracking/simulate");
    info!("Geofence:");
    info!("   Get Zone:          GET  http://localhost:{port}/api/geofence");
    info!("   Replace Zone:      PUT  http://localhost:{port}/api/geofence");
    info!("Alerts:");
    info!("   List Alerts:       GET  http://localhost:{port}/api/alerts");
    info!("   Acknowledge:       POST http://localhost:{port}/api/alerts/{{id}}/read");
    info!("Monitoring:");
    info!("   Health Check:      GET  http://localhost:{port}/api/health");
    info!("=== End of Endpoint List ===");
}
