//! Validate config command implementation

use super::EXIT_CONFIG;
use crate::cli::resolve_config;
use crate::config::MdbConfig;
use crate::domain::BackendKind;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

/// Connection target for display, without credentials
pub fn describe_target(config: &MdbConfig, kind: BackendKind) -> String {
    match kind {
        BackendKind::MySql => format!(
            "{}@{}:{}/{}",
            config.mysql.user, config.mysql.host, config.mysql.port, config.mysql.database
        ),
        BackendKind::PostgreSql => format!(
            "{}@{}:{}/{}",
            config.postgresql.user,
            config.postgresql.host,
            config.postgresql.port,
            config.postgresql.database
        ),
        BackendKind::MongoDb => config.mongodb.uri_safe(),
        BackendKind::Sqlite => config.sqlite.path.clone(),
        BackendKind::Oracle => format!("{}@{}", config.oracle.user, config.oracle.connect_string),
    }
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        let source = config_path.unwrap_or("defaults + environment");
        tracing::info!(config_path = %source, "Validating configuration");

        println!("🔍 Validating configuration: {source}");
        println!();

        // Loading also validates
        let config = match resolve_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Listen Address: {}", config.server.bind_address());
        println!(
            "  Page Size: default {}, max {}",
            config.api.default_page_size, config.api.max_page_size
        );
        println!("  Backends:");
        for kind in BackendKind::ALL {
            if config.is_enabled(kind) {
                println!("    {:<12} {}", kind, describe_target(&config, kind));
            } else {
                println!("    {:<12} (disabled)", kind);
            }
        }
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_target_hides_credentials() {
        let config = MdbConfig::default();

        assert_eq!(
            describe_target(&config, BackendKind::MySql),
            "mdb_user@localhost:3307/postal_codes_db"
        );
        assert_eq!(
            describe_target(&config, BackendKind::Oracle),
            "system@localhost:1522/XE"
        );
        assert!(!describe_target(&config, BackendKind::MongoDb).contains("adminpassword"));
    }
}
