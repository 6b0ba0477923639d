//! Status command implementation
//!
//! Connects to every enabled backend and prints its row count.

use super::{EXIT_CONFIG, EXIT_CONNECTION};
use crate::adapters::database::{ConfiguredDriverFactory, ConnectionRegistry};
use crate::cli::resolve_config;
use crate::core::{StatsReporter, StatsStatus};
use clap::Args;
use std::sync::Arc;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        tracing::info!("Checking backend status");

        println!("📊 Backend Status");
        println!();

        let config = match resolve_config(config_path) {
            Ok(config) => Arc::new(config),
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let factory = Arc::new(ConfiguredDriverFactory::new(Arc::clone(&config)));
        let registry = Arc::new(
            ConnectionRegistry::new(factory).with_connect_timeout(config.application.connect_timeout()),
        );
        let stats = StatsReporter::new(Arc::clone(&registry)).collect().await;
        registry.close_all().await;

        println!("{:<12} {:<16} {:>12}  {}", "Database", "Status", "Records", "Detail");
        println!("{}", "-".repeat(72));

        let mut unreachable = 0;
        for (kind, entry) in &stats {
            let (status, detail) = if !config.is_enabled(*kind) {
                ("⏸️  Disabled", String::new())
            } else if entry.status == StatsStatus::Connected {
                ("✅ Connected", String::new())
            } else {
                unreachable += 1;
                ("❌ Error", entry.error.clone().unwrap_or_default())
            };

            println!(
                "{:<12} {:<16} {:>12}  {}",
                kind.as_str(),
                status,
                entry.record_count,
                detail
            );
        }
        println!();

        if unreachable > 0 {
            println!("{unreachable} enabled backend(s) unreachable");
            return Ok(EXIT_CONNECTION);
        }
        Ok(0)
    }
}
