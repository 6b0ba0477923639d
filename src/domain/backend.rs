//! Backend identity
//!
//! The five storage engines MDB compares, addressed everywhere by a lowercase tag.

use super::errors::MdbError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the supported storage engines
///
/// # Examples
///
/// ```
/// use mdb::domain::BackendKind;
/// use std::str::FromStr;
///
/// let kind = BackendKind::from_str("sqlite").unwrap();
/// assert_eq!(kind, BackendKind::Sqlite);
/// assert_eq!(kind.as_str(), "sqlite");
/// assert!(BackendKind::from_str("redis").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Row-store relational engine through the MySQL protocol
    #[serde(rename = "mysql")]
    MySql,
    /// Row-store relational engine through the PostgreSQL protocol
    #[serde(rename = "postgresql")]
    PostgreSql,
    /// Document store
    #[serde(rename = "mongodb")]
    MongoDb,
    /// Embedded file-based store
    Sqlite,
    /// Enterprise relational engine
    Oracle,
}

impl BackendKind {
    /// Every backend, in the order responses list them
    pub const ALL: [BackendKind; 5] = [
        BackendKind::MySql,
        BackendKind::PostgreSql,
        BackendKind::MongoDb,
        BackendKind::Sqlite,
        BackendKind::Oracle,
    ];

    /// Wire tag of the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::MySql => "mysql",
            BackendKind::PostgreSql => "postgresql",
            BackendKind::MongoDb => "mongodb",
            BackendKind::Sqlite => "sqlite",
            BackendKind::Oracle => "oracle",
        }
    }

    /// Tags of every supported backend, for client error payloads
    pub fn supported_tags() -> Vec<&'static str> {
        Self::ALL.iter().map(BackendKind::as_str).collect()
    }

    /// Static description served by `/api/databases/info`
    pub fn info(&self) -> BackendInfo {
        match self {
            BackendKind::MySql => BackendInfo {
                kind: "Relational Database",
                port: Some(3306),
                features: &["ACID", "Transactions", "Indexing", "Replication"],
            },
            BackendKind::PostgreSql => BackendInfo {
                kind: "Object-Relational Database",
                port: Some(5432),
                features: &["ACID", "JSON Support", "Extensions", "Full-text Search"],
            },
            BackendKind::MongoDb => BackendInfo {
                kind: "Document Database",
                port: Some(27017),
                features: &["Schema-less", "GridFS", "Aggregation Pipeline", "Sharding"],
            },
            BackendKind::Sqlite => BackendInfo {
                kind: "File-based Database",
                port: None,
                features: &[
                    "Serverless",
                    "Self-contained",
                    "Zero-configuration",
                    "Cross-platform",
                ],
            },
            BackendKind::Oracle => BackendInfo {
                kind: "Enterprise Database",
                port: Some(1521),
                features: &["ACID", "PL/SQL", "Partitioning", "Advanced Analytics"],
            },
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = MdbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mysql" => Ok(BackendKind::MySql),
            "postgresql" => Ok(BackendKind::PostgreSql),
            "mongodb" => Ok(BackendKind::MongoDb),
            "sqlite" => Ok(BackendKind::Sqlite),
            "oracle" => Ok(BackendKind::Oracle),
            other => Err(MdbError::UnsupportedBackend(other.to_string())),
        }
    }
}

/// Static metadata about a backend engine
#[derive(Debug, Clone, Serialize)]
pub struct BackendInfo {
    /// Engine family
    #[serde(rename = "type")]
    pub kind: &'static str,

    /// Default server port; `None` for embedded engines
    #[serde(serialize_with = "serialize_port")]
    pub port: Option<u16>,

    /// Headline features
    pub features: &'static [&'static str],
}

fn serialize_port<S>(port: &Option<u16>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match port {
        Some(port) => serializer.serialize_u16(*port),
        None => serializer.serialize_str("N/A"),
    }
}
