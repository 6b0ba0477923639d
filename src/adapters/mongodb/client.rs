//! MongoDB client implementation

use crate::config::schema::MongoDbConfig;
use crate::domain::{BackendError, BackendKind, Result};
use mongodb::bson::{doc, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use secrecy::ExposeSecret;
use std::time::Duration;

const KIND: BackendKind = BackendKind::MongoDb;

/// Collection holding postal documents
pub const POSTAL_COLLECTION: &str = "postal_codes";

const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// MongoDB client for MDB
pub struct MongoDbClient {
    client: Client,
    database: Database,
    config: MongoDbConfig,
}

impl MongoDbClient {
    /// Create a new MongoDB client and ping the server
    ///
    /// The database named in the URI wins over `config.database`.
    ///
    /// # Errors
    ///
    /// Returns a connection error for an unparsable URI or an unreachable server.
    pub async fn new(config: MongoDbConfig) -> Result<Self> {
        let mut options = ClientOptions::parse(config.uri.expose_secret().as_ref())
            .await
            .map_err(|e| BackendError::connection(KIND, format!("Invalid MongoDB URI: {e}")))?;
        options.app_name = Some("mdb".to_string());
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);

        let client = Client::with_options(options).map_err(|e| BackendError::connection(KIND, e))?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(&config.database));

        let mongo = Self {
            client,
            database,
            config,
        };
        mongo.test_connection().await?;

        tracing::info!(
            backend = %KIND,
            target = %mongo.config.uri_safe(),
            database = %mongo.database.name(),
            "MongoDB client ready"
        );
        Ok(mongo)
    }

    /// Run the `ping` command
    pub async fn test_connection(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map(|_| ())
            .map_err(|e| BackendError::connection(KIND, format!("Ping failed: {e}")))
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn postal_collection(&self) -> Collection<Document> {
        self.database.collection(POSTAL_COLLECTION)
    }

    pub fn config(&self) -> &MongoDbConfig {
        &self.config
    }

    /// Shut down background monitors and close pooled connections
    pub async fn close(&self) {
        self.client.clone().shutdown().await;
    }
}
