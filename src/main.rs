// MDB - Multi-Database Postal Code API
// Copyright (c) 2025 MDB Contributors
// Licensed under the MIT License

use clap::Parser;
use mdb::cli::{resolve_config, Cli, Commands};
use mdb::config::LoggingConfig;
use mdb::logging::init_logging;
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // File logging only for the long-running server; the other commands log to the console
    let loaded = resolve_config(cli.config.as_deref()).ok();
    let logging_config = match (&cli.command, &loaded) {
        (Commands::Serve(_), Some(config)) => config.logging.clone(),
        _ => LoggingConfig::default(),
    };
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| loaded.as_ref().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());

    let logging_guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "MDB - Multi-Database Postal Code API"
    );

    // Create shutdown signal channel for graceful shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {
                            tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
                        }
                        _ = sigterm.recv() => {
                            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "SIGTERM handler unavailable, listening for Ctrl+C only");
                    let _ = tokio::signal::ctrl_c().await;
                    tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
                }
            }
            let _ = shutdown_tx.send(true);
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                // Keep the sender alive so the server is not shut down
                std::future::pending::<()>().await;
            } else {
                tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
                let _ = shutdown_tx.send(true);
            }
        }
    });

    let exit_code = match execute_command(&cli, shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    // Flush file logs before exiting
    drop(logging_guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, shutdown_signal: watch::Receiver<bool>) -> anyhow::Result<i32> {
    let config = cli.config.as_deref();
    match &cli.command {
        Commands::Serve(args) => args.execute(config, shutdown_signal).await,
        Commands::ValidateConfig(args) => args.execute(config).await,
        Commands::Status(args) => args.execute(config).await,
        Commands::Init(args) => args.execute().await,
    }
}
