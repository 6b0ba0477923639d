//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::MdbConfig;
use super::secret::secret_string;
use crate::domain::errors::MdbError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`MdbConfig`]
/// 4. Applies environment variable overrides
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file is missing or unreadable, a referenced variable is
/// unset, the TOML is malformed or validation fails.
///
/// # Examples
///
/// ```no_run
/// use mdb::config::load_config;
///
/// let config = load_config("mdb.toml").expect("Failed to load config");
/// println!("listening on {}", config.server.bind_address());
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<MdbConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MdbError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        MdbError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let config: MdbConfig = toml::from_str(&contents)
        .map_err(|e| MdbError::Configuration(format!("Failed to parse TOML: {e}")))?;

    finalize(config)
}

/// Loads configuration from `path` when given, otherwise from defaults plus environment
///
/// The server is expected to run from environment variables alone (as in a container),
/// so the file is optional.
///
/// # Errors
///
/// Same as [`load_config`], plus validation failures of env-only configuration.
pub fn load_config_or_default(path: Option<&Path>) -> Result<MdbConfig> {
    match path {
        Some(path) => load_config(path),
        None => finalize(MdbConfig::default()),
    }
}

fn finalize(mut config: MdbConfig) -> Result<MdbConfig> {
    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        MdbError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid placeholder regex"))
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = placeholder_regex();
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(MdbError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(val) => val.trim().parse().map(Some).map_err(|_| {
            MdbError::Configuration(format!("Environment variable {name} has invalid value '{val}'"))
        }),
        Err(_) => Ok(None),
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Applies environment variable overrides
///
/// Variable names match the ones the docker-compose setup exports (`MYSQL_HOST`,
/// `POSTGRES_PORT`, `MONGODB_URI`, ...). `MDB_<SECTION>_ENABLED` switches a backend off.
fn apply_env_overrides(config: &mut MdbConfig) -> Result<()> {
    // Application
    if let Some(val) = env_string("MDB_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Server
    if let Some(val) = env_string("MDB_HOST") {
        config.server.host = val;
    }
    if let Some(port) = env_parse("PORT")? {
        config.server.port = port;
    }

    // MySQL
    if let Some(val) = env_parse("MDB_MYSQL_ENABLED")? {
        config.mysql.enabled = val;
    }
    if let Some(val) = env_string("MYSQL_HOST") {
        config.mysql.host = val;
    }
    if let Some(port) = env_parse("MYSQL_PORT")? {
        config.mysql.port = port;
    }
    if let Some(val) = env_string("MYSQL_USER") {
        config.mysql.user = val;
    }
    if let Some(val) = env_string("MYSQL_PASSWORD") {
        config.mysql.password = secret_string(val);
    }
    if let Some(val) = env_string("MYSQL_DATABASE") {
        config.mysql.database = val;
    }

    // PostgreSQL
    if let Some(val) = env_parse("MDB_POSTGRESQL_ENABLED")? {
        config.postgresql.enabled = val;
    }
    if let Some(val) = env_string("POSTGRES_HOST") {
        config.postgresql.host = val;
    }
    if let Some(port) = env_parse("POSTGRES_PORT")? {
        config.postgresql.port = port;
    }
    if let Some(val) = env_string("POSTGRES_USER") {
        config.postgresql.user = val;
    }
    if let Some(val) = env_string("POSTGRES_PASSWORD") {
        config.postgresql.password = secret_string(val);
    }
    if let Some(val) = env_string("POSTGRES_DATABASE") {
        config.postgresql.database = val;
    }

    // MongoDB
    if let Some(val) = env_parse("MDB_MONGODB_ENABLED")? {
        config.mongodb.enabled = val;
    }
    if let Some(val) = env_string("MONGODB_URI") {
        config.mongodb.uri = secret_string(val);
    }

    // SQLite
    if let Some(val) = env_parse("MDB_SQLITE_ENABLED")? {
        config.sqlite.enabled = val;
    }
    if let Some(val) = env_string("SQLITE_PATH") {
        config.sqlite.path = val;
    }

    // Oracle
    if let Some(val) = env_parse("MDB_ORACLE_ENABLED")? {
        config.oracle.enabled = val;
    }
    if let Some(val) = env_string("ORACLE_USER") {
        config.oracle.user = val;
    }
    if let Some(val) = env_string("ORACLE_PASSWORD") {
        config.oracle.password = secret_string(val);
    }
    if let Some(val) = env_string("ORACLE_CONNECTION") {
        config.oracle.connect_string = val;
    }

    // Logging
    if let Some(val) = env_parse("MDB_LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = val;
    }
    if let Some(val) = env_string("MDB_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Tests in this module mutate process environment
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_substitute_env_vars() {
        let _guard = ENV_MUTEX.lock().unwrap();
        std::env::set_var("MDB_TEST_VAR", "test_value");
        let input = "password = \"${MDB_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"\n");
        std::env::remove_var("MDB_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        let _guard = ENV_MUTEX.lock().unwrap();
        std::env::remove_var("MDB_MISSING_VAR");
        let input = "password = \"${MDB_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("MDB_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        let _guard = ENV_MUTEX.lock().unwrap();
        std::env::remove_var("MDB_COMMENTED_VAR");
        let input = "# password = \"${MDB_COMMENTED_VAR}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-mdb.toml");
        assert!(matches!(result, Err(MdbError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let toml_content = r#"
[server]
port = 4000

[mysql]
host = "db.internal"
port = 3306

[sqlite]
path = "/tmp/mdb-test.db"

[oracle]
enabled = false
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.mysql.host, "db.internal");
        assert_eq!(config.mysql.port, 3306);
        assert_eq!(config.sqlite.path, "/tmp/mdb-test.db");
        assert!(!config.oracle.enabled);
        assert_eq!(config.postgresql.port, 5433);
    }

    #[test]
    fn test_invalid_env_port_is_rejected() {
        let _guard = ENV_MUTEX.lock().unwrap();
        std::env::set_var("MYSQL_PORT", "not-a-port");
        let result = load_config_or_default(None);
        std::env::remove_var("MYSQL_PORT");

        let err = result.unwrap_err();
        assert!(err.to_string().contains("MYSQL_PORT"));
    }
}
