//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG, EXIT_FATAL};
use crate::cli::DEFAULT_CONFIG_FILE;
use crate::domain::context::ResultExt;
use clap::Args;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

/// Sample configuration matching the local docker-compose ports
pub const SAMPLE_CONFIG: &str = r#"# MDB Configuration File
# Every value below is the built-in default; delete what you do not change.
# ${VAR} placeholders are replaced from the environment before parsing.

[application]
log_level = "info"           # trace | debug | info | warn | error
connect_on_startup = true    # connect every enabled backend when serving
connect_timeout_seconds = 30 # give up on a single connection attempt after this

[server]
host = "localhost"
port = 3001
body_limit_bytes = 10485760  # 10 MiB

[api]
default_page_size = 10
max_page_size = 1000

[mysql]
enabled = true
host = "localhost"
port = 3307
user = "mdb_user"
password = "${MYSQL_PASSWORD}"
database = "postal_codes_db"
max_connections = 5

[postgresql]
enabled = true
host = "localhost"
port = 5433
user = "mdb_user"
password = "${POSTGRES_PASSWORD}"
database = "postal_codes_db"
max_connections = 5
connection_timeout_seconds = 10

[mongodb]
enabled = true
uri = "${MONGODB_URI}"
database = "postal_codes_db"
country_code = "KR"
country_name = "South Korea"

[sqlite]
enabled = true
path = "./data/postal_codes.db"
busy_timeout_ms = 5000

[oracle]
enabled = true
user = "system"
password = "${ORACLE_PASSWORD}"
connect_string = "localhost:1522/XE"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"     # daily | hourly
console_json = false
"#;

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing MDB configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        let written = tokio::fs::write(&self.output, SAMPLE_CONFIG)
            .await
            .with_context(|| format!("Failed to write {}", self.output));

        match written {
            Ok(()) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Export MYSQL_PASSWORD, POSTGRES_PASSWORD, MONGODB_URI and ORACLE_PASSWORD");
                println!("     (or put them in a .env file)");
                println!("  3. Validate configuration: mdb validate-config");
                println!("  4. Start the API: mdb serve");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}
