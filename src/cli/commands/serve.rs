//! Serve command implementation
//!
//! Builds the connection registry, starts the HTTP API and closes every backend
//! handle once a shutdown signal arrives.

use super::{EXIT_CONFIG, EXIT_FATAL};
use crate::adapters::database::{ConfiguredDriverFactory, ConnectionRegistry};
use crate::api::{router, AppState};
use crate::cli::resolve_config;
use crate::config::MdbConfig;
use anyhow::Context;
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Arguments for the serve command
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Bind host, overriding `server.host`
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port, overriding `server.port` and `PORT`
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Skip the initial connection round
    #[arg(long)]
    pub lazy: bool,
}

impl ServeArgs {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut MdbConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.lazy {
            config.application.connect_on_startup = false;
        }
    }

    /// Execute the serve command
    pub async fn execute(
        &self,
        config_path: Option<&str>,
        mut shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let mut config = match resolve_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("❌ {e}");
                return Ok(EXIT_CONFIG);
            }
        };
        self.apply(&mut config);

        let config = Arc::new(config);
        let factory = Arc::new(ConfiguredDriverFactory::new(Arc::clone(&config)));
        let registry = Arc::new(
            ConnectionRegistry::new(factory).with_connect_timeout(config.application.connect_timeout()),
        );
        let app = router(AppState::new(Arc::clone(&config), Arc::clone(&registry)));

        let address = config.server.bind_address();
        let listener = match tokio::net::TcpListener::bind(&address).await {
            Ok(listener) => listener,
            Err(e) => {
                tracing::error!(address = %address, error = %e, "Failed to bind");
                eprintln!("❌ Failed to bind {address}: {e}");
                return Ok(EXIT_FATAL);
            }
        };
        tracing::info!(address = %address, "MDB API listening");
        println!("🚀 MDB API listening on http://{address}");

        let startup = config.application.connect_on_startup.then(|| {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                registry.connect_all().await;
            })
        });

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                // Either a signal or the sender going away ends the server
                let _ = shutdown_signal.wait_for(|stop| *stop).await;
                tracing::info!("Shutting down HTTP server");
            })
            .await
            .context("HTTP server error")?;

        close_registry(&registry, startup).await;
        Ok(0)
    }
}

/// Stop the startup connection round, then close every handle
///
/// The round is aborted and awaited first so nothing it connects can outlive
/// `close_all`.
pub async fn close_registry(registry: &ConnectionRegistry, startup: Option<JoinHandle<()>>) {
    if let Some(task) = startup {
        task.abort();
        if let Err(e) = task.await {
            if !e.is_cancelled() {
                tracing::warn!(error = %e, "Startup connection task failed");
            }
        }
    }

    registry.close_all().await;
    tracing::info!("All backend connections closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_to_config() {
        let args = ServeArgs {
            host: Some("0.0.0.0".to_string()),
            port: Some(8080),
            lazy: true,
        };
        let mut config = MdbConfig::default();
        args.apply(&mut config);

        assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
        assert!(!config.application.connect_on_startup);
    }

    #[tokio::test]
    async fn test_close_registry_stops_startup_round() {
        let mut config = MdbConfig::default();
        config.mysql.enabled = false;
        config.postgresql.enabled = false;
        config.mongodb.enabled = false;
        config.oracle.enabled = false;
        config.sqlite.path = crate::adapters::sqlite::client::IN_MEMORY.to_string();

        let factory = Arc::new(ConfiguredDriverFactory::new(Arc::new(config)));
        let registry = Arc::new(ConnectionRegistry::new(factory));

        let startup = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                registry.connect_all().await;
            })
        };
        close_registry(&registry, Some(startup)).await;

        assert!(!registry.is_cached(crate::domain::BackendKind::Sqlite).await);
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let mut config = MdbConfig::default();
        ServeArgs::default().apply(&mut config);

        assert_eq!(config.server.port, 3001);
        assert!(config.application.connect_on_startup);
    }
}
