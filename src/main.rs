// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use tracing::{error, info, warn};

use vocab_tracker_server::{
    api::router,
    auth::token::RECOMMENDED_SECRET_LEN,
    config::{AppConfig, LogFormat},
    state::AppState,
    storage::Storage,
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    init_tracing(LogFormat::from_env());

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if config.auth.secret.is_weak() {
        warn!(
            secret_len = config.auth.secret.len(),
            recommended = RECOMMENDED_SECRET_LEN,
            "JWT_SECRET is shorter than recommended"
        );
    }

    let db_path = config.database_path();
    let storage = match Storage::open(&db_path) {
        Ok(storage) => storage,
        Err(e) => {
            error!(path = %db_path.display(), "Failed to open database: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(path = %db_path.display(), "Database ready");

    let state = match AppState::new(storage, &config.auth) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialise auth service: {e}");
            return ExitCode::FAILURE;
        }
    };
    let app = router(state, &config.allowed_origins);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind_addr, "Failed to bind: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        addr = %config.bind_addr,
        origins = ?config.allowed_origins,
        "Vocab Tracker server listening (docs at /docs)"
    );

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {e}");
        return ExitCode::FAILURE;
    }

    info!("Server stopped");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
