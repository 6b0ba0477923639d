//! MongoDB adapter implementing [`BackendDriver`]
//!
//! The record id is stored as `_id`, so the primary-key index doubles as the
//! duplicate check. Documents also carry the normalised `postal_code`, `country_code`
//! and `country_name` fields the collection validator requires.

use crate::adapters::database::traits::{BackendDriver, InsertOutcome, Page, SchemaMode};
use crate::adapters::mongodb::client::{MongoDbClient, POSTAL_COLLECTION};
use crate::domain::{BackendError, BackendKind, PostalRow, Result, StoredPostalRecord};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, DateTime, Document};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{CreateCollectionOptions, FindOptions};
use mongodb::IndexModel;
use std::any::Any;

const KIND: BackendKind = BackendKind::MongoDb;

const DUPLICATE_KEY: i32 = 11000;
const NAMESPACE_EXISTS: i32 = 48;

/// MongoDB implementation of [`BackendDriver`]
pub struct MongoDbAdapter {
    client: MongoDbClient,
}

impl MongoDbAdapter {
    pub fn new(client: MongoDbClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &MongoDbClient {
        &self.client
    }

    async fn collection_exists(&self) -> Result<bool> {
        let names = self
            .client
            .database()
            .list_collection_names(doc! { "name": POSTAL_COLLECTION })
            .await
            .map_err(|e| BackendError::schema(KIND, e))?;
        Ok(names.iter().any(|name| name == POSTAL_COLLECTION))
    }

    async fn create_collection(&self) -> Result<()> {
        let options = CreateCollectionOptions::builder()
            .validator(postal_validator())
            .build();

        match self
            .client
            .database()
            .create_collection(POSTAL_COLLECTION, options)
            .await
        {
            Ok(()) => {
                tracing::info!(backend = %KIND, "Created postal_codes collection");
                Ok(())
            }
            // Another request created it first
            Err(e) if command_error_code(&e) == Some(NAMESPACE_EXISTS) => Ok(()),
            Err(e) => Err(BackendError::schema(KIND, e)),
        }
    }

    async fn create_indexes(&self) -> Result<()> {
        let indexes = [
            doc! { "postal_code": 1 },
            doc! { "country_code": 1, "postal_code": 1 },
            doc! { "createdAt": -1 },
        ]
        .into_iter()
        .map(|keys| IndexModel::builder().keys(keys).build());

        self.client
            .postal_collection()
            .create_indexes(indexes, None)
            .await
            .map(|_| ())
            .map_err(|e| BackendError::schema(KIND, e))
    }

    fn to_document(&self, row: &PostalRow) -> Document {
        let config = self.client.config();
        doc! {
            "_id": row.id.as_str(),
            "postal_code": row.zip_code.as_str(),
            "country_code": config.country_code.as_str(),
            "country_name": config.country_name.as_str(),
            "zipCode": row.zip_code.as_str(),
            "sido": row.sido.as_str(),
            "sigungu": row.sigungu.as_str(),
            "eupmyeon": row.eupmyeon.as_str(),
            "roadName": row.road_name.as_str(),
            "buildingMain": row.building_main,
            "buildingSub": row.building_sub,
            "fullRoadAddress": row.full_road_address.as_str(),
            "fullJibunAddress": row.full_jibun_address.as_str(),
            "createdAt": DateTime::now(),
        }
    }
}

/// `$jsonSchema` validator applied when the collection is created
pub fn postal_validator() -> Document {
    doc! {
        "$jsonSchema": {
            "bsonType": "object",
            "required": ["postal_code", "country_code", "country_name"],
            "properties": {
                "postal_code": { "bsonType": "string", "maxLength": 20 },
                "country_code": { "bsonType": "string", "maxLength": 3 },
                "country_name": { "bsonType": "string", "maxLength": 100 },
                "createdAt": { "bsonType": "date" },
            }
        }
    }
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

fn command_error_code(err: &MongoError) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Command(command_error) => Some(command_error.code),
        _ => None,
    }
}

fn bson_text(doc: &Document, key: &str) -> String {
    match doc.get(key) {
        Some(Bson::String(s)) => s.clone(),
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(Bson::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn bson_number(doc: &Document, key: &str) -> i64 {
    match doc.get(key) {
        Some(Bson::Int32(n)) => i64::from(*n),
        Some(Bson::Int64(n)) => *n,
        Some(Bson::Double(n)) => *n as i64,
        _ => 0,
    }
}

/// Map a stored document back to the common record shape
///
/// Documents written by older tools may lack `zipCode` or use an ObjectId `_id`.
pub fn stored_from_document(doc: &Document) -> StoredPostalRecord {
    let zip_code = match bson_text(doc, "zipCode") {
        zip if zip.is_empty() => bson_text(doc, "postal_code"),
        zip => zip,
    };
    let created_at = match doc.get("createdAt") {
        Some(Bson::DateTime(dt)) => dt.try_to_rfc3339_string().ok(),
        _ => None,
    };

    StoredPostalRecord::from_row(
        PostalRow {
            id: bson_text(doc, "_id"),
            zip_code,
            sido: bson_text(doc, "sido"),
            sigungu: bson_text(doc, "sigungu"),
            eupmyeon: bson_text(doc, "eupmyeon"),
            road_name: bson_text(doc, "roadName"),
            building_main: bson_number(doc, "buildingMain"),
            building_sub: bson_number(doc, "buildingSub"),
            full_road_address: bson_text(doc, "fullRoadAddress"),
            full_jibun_address: bson_text(doc, "fullJibunAddress"),
        },
        created_at,
    )
}

#[async_trait]
impl BackendDriver for MongoDbAdapter {
    fn kind(&self) -> BackendKind {
        KIND
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    async fn ping(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_schema(&self, mode: SchemaMode) -> Result<()> {
        if mode == SchemaMode::Destructive {
            tracing::info!(backend = %KIND, "Dropping postal_codes collection");
            self.client
                .postal_collection()
                .drop(None)
                .await
                .map_err(|e| BackendError::schema(KIND, e))?;
        }

        if !self.collection_exists().await? {
            self.create_collection().await?;
        }
        self.create_indexes().await
    }

    fn import_schema_mode(&self) -> SchemaMode {
        SchemaMode::Additive
    }

    async fn insert_one(&self, row: &PostalRow) -> Result<InsertOutcome> {
        let document = self.to_document(row);

        match self.client.postal_collection().insert_one(document, None).await {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) if is_duplicate_key(&e) => Ok(InsertOutcome::Duplicate),
            Err(e) => Err(BackendError::insert(KIND, e)),
        }
    }

    async fn select_page(&self, page: Page) -> Result<Vec<StoredPostalRecord>> {
        // A zero limit means "no limit" to the server
        if page.limit == 0 {
            return Ok(Vec::new());
        }

        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .skip(page.offset)
            .limit(i64::try_from(page.limit).unwrap_or(i64::MAX))
            .build();

        let documents: Vec<Document> = self
            .client
            .postal_collection()
            .find(None, options)
            .await
            .map_err(|e| BackendError::query(KIND, e))?
            .try_collect()
            .await
            .map_err(|e| BackendError::query(KIND, e))?;

        Ok(documents.iter().map(stored_from_document).collect())
    }

    async fn count(&self) -> Result<u64> {
        self.client
            .postal_collection()
            .count_documents(None, None)
            .await
            .map_err(|e| BackendError::query(KIND, e))
    }

    async fn close(&self) -> Result<()> {
        self.client.close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_validator_requires_country_fields() {
        let validator = postal_validator();
        let schema = validator.get_document("$jsonSchema").unwrap();
        let required: Vec<&str> = schema
            .get_array("required")
            .unwrap()
            .iter()
            .filter_map(Bson::as_str)
            .collect();

        assert_eq!(required, vec!["postal_code", "country_code", "country_name"]);
    }

    #[test]
    fn test_stored_from_document_reads_camel_case_fields() {
        let created = DateTime::from_millis(1_700_000_000_123);
        let document = doc! {
            "_id": "25627_1700000000123_abcdefghi",
            "postal_code": "25627",
            "zipCode": "25627",
            "sido": "강원특별자치도",
            "buildingMain": 2100_i32,
            "buildingSub": 3_i64,
            "createdAt": created,
        };

        let record = stored_from_document(&document);
        assert_eq!(record.id, "25627_1700000000123_abcdefghi");
        assert_eq!(record.zip_code, "25627");
        assert_eq!(record.sido, "강원특별자치도");
        assert_eq!(record.sigungu, "");
        assert_eq!(record.building_main, 2100);
        assert_eq!(record.building_sub, 3);
        assert!(record
            .created_at
            .as_deref()
            .is_some_and(|ts| ts.starts_with("2023-11-14T22:13:20.123")));
    }

    #[test]
    fn test_stored_from_document_handles_legacy_shape() {
        let oid = ObjectId::new();
        let document = doc! { "_id": oid, "postal_code": "06236" };

        let record = stored_from_document(&document);
        assert_eq!(record.id, oid.to_hex());
        assert_eq!(record.zip_code, "06236");
        assert_eq!(record.created_at, None);
    }
}
