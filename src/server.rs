//! HTTP server lifecycle: startup, serving and graceful shutdown.

use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;

use crate::api::routes::create_router;
use crate::config::{Environment, settings::Settings};
use crate::state::AppState;

/// HTTP server manager
pub struct Server {
    settings: Settings,
}

impl Server {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Start the server and run until a shutdown signal arrives.
    ///
    /// In-flight requests get `server.shutdown_timeout` seconds to finish
    /// once the signal is received.
    ///
    /// # Errors
    /// - Store or HTTP client initialization errors
    /// - Address binding errors
    /// - Server runtime errors
    pub async fn run(self) -> anyhow::Result<()> {
        self.log_configuration();

        let state = AppState::from_settings(&self.settings)
            .await
            .context("Failed to initialize application state")?;
        let router = create_router(state);
        tracing::info!("Router configured");

        let address = self.settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;
        tracing::info!(
            address = %address,
            role = %self.settings.service.role,
            "Server listening"
        );

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let serve = axum::serve(listener, router).with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        });
        let mut server = tokio::spawn(serve.into_future());

        tokio::select! {
            result = &mut server => {
                result.context("Server task panicked")??;
                tracing::info!("Server stopped");
                return Ok(());
            }
            _ = shutdown_signal() => {}
        }

        let _ = shutdown_tx.send(true);
        let grace = Duration::from_secs(self.settings.server.shutdown_timeout);
        match tokio::time::timeout(grace, server).await {
            Ok(result) => {
                result.context("Server task panicked")??;
                tracing::info!("Server shutdown complete");
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = grace.as_secs(),
                    "Graceful shutdown timed out, dropping open connections"
                );
            }
        }

        Ok(())
    }

    fn log_configuration(&self) {
        let settings = &self.settings;
        tracing::info!(
            app_name = %settings.application.name,
            app_version = %settings.application.version,
            environment = %Environment::from_env().as_str(),
            role = %settings.service.role,
            "Application starting"
        );

        tracing::info!(
            host = %settings.server.host,
            port = settings.server.port,
            shutdown_timeout = settings.server.shutdown_timeout,
            "Server configuration loaded"
        );

        if settings.service.role.is_core() {
            // The URL may carry credentials, so only pool sizing is logged.
            tracing::info!(
                backend = ?settings.database.backend,
                max_connections = settings.database.max_connections,
                min_connections = settings.database.min_connections,
                auto_migrate = settings.database.auto_migrate,
                "Database configuration loaded"
            );
        }

        tracing::info!(
            level = %settings.logger.level,
            console_enabled = settings.logger.console.enabled,
            file_enabled = settings.logger.file.enabled,
            "Logger configuration loaded"
        );
    }
}

/// Waits for Ctrl+C or SIGTERM.
///
/// A handler that fails to install is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
