//! Postal-code records
//!
//! [`PostalRecord`] is what callers send, [`PostalRow`] is what every driver writes and
//! [`StoredPostalRecord`] is what every driver reads back.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of the random suffix appended to synthesised ids
pub const ID_SUFFIX_LEN: usize = 9;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Postal-code record as submitted to the import endpoint
///
/// Every field except `zipCode` may be omitted; omitted text defaults to an empty
/// string and omitted numbers to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostalRecord {
    /// Primary key; synthesised when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Postal code, not validated
    pub zip_code: String,

    /// Province
    pub sido: Option<String>,

    /// City / district
    pub sigungu: Option<String>,

    /// Town / township
    pub eupmyeon: Option<String>,

    /// Road name
    pub road_name: Option<String>,

    /// Main building number
    pub building_main: Option<i64>,

    /// Sub building number
    pub building_sub: Option<i64>,

    /// Full road-name address
    pub full_road_address: Option<String>,

    /// Full lot-number address
    pub full_jibun_address: Option<String>,
}

impl PostalRecord {
    /// Creates a record with only a zip code
    pub fn new(zip_code: impl Into<String>) -> Self {
        Self {
            zip_code: zip_code.into(),
            ..Default::default()
        }
    }

    /// Sets an explicit id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the administrative regions
    pub fn with_region(
        mut self,
        sido: impl Into<String>,
        sigungu: impl Into<String>,
        eupmyeon: impl Into<String>,
    ) -> Self {
        self.sido = Some(sido.into());
        self.sigungu = Some(sigungu.into());
        self.eupmyeon = Some(eupmyeon.into());
        self
    }

    /// Sets the road address parts
    pub fn with_road(mut self, road_name: impl Into<String>, main: i64, sub: i64) -> Self {
        self.road_name = Some(road_name.into());
        self.building_main = Some(main);
        self.building_sub = Some(sub);
        self
    }

    /// Normalises the record into the shape every driver writes
    ///
    /// An empty or missing id is replaced by [`generate_record_id`].
    pub fn to_row(&self) -> PostalRow {
        let id = match self.id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => generate_record_id(&self.zip_code),
        };

        PostalRow {
            id,
            zip_code: self.zip_code.clone(),
            sido: self.sido.clone().unwrap_or_default(),
            sigungu: self.sigungu.clone().unwrap_or_default(),
            eupmyeon: self.eupmyeon.clone().unwrap_or_default(),
            road_name: self.road_name.clone().unwrap_or_default(),
            building_main: self.building_main.unwrap_or(0),
            building_sub: self.building_sub.unwrap_or(0),
            full_road_address: self.full_road_address.clone().unwrap_or_default(),
            full_jibun_address: self.full_jibun_address.clone().unwrap_or_default(),
        }
    }
}

/// Record with every column resolved, ready to bind as statement parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalRow {
    pub id: String,
    pub zip_code: String,
    pub sido: String,
    pub sigungu: String,
    pub eupmyeon: String,
    pub road_name: String,
    pub building_main: i64,
    pub building_sub: i64,
    pub full_road_address: String,
    pub full_jibun_address: String,
}

/// Record as read back from a backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPostalRecord {
    pub id: String,
    pub zip_code: String,
    pub sido: String,
    pub sigungu: String,
    pub eupmyeon: String,
    pub road_name: String,
    pub building_main: i64,
    pub building_sub: i64,
    pub full_road_address: String,
    pub full_jibun_address: String,

    /// Creation timestamp as rendered by the backend
    pub created_at: Option<String>,
}

impl StoredPostalRecord {
    /// Builds a stored record from a row and the backend's creation timestamp
    pub fn from_row(row: PostalRow, created_at: Option<String>) -> Self {
        Self {
            id: row.id,
            zip_code: row.zip_code,
            sido: row.sido,
            sigungu: row.sigungu,
            eupmyeon: row.eupmyeon,
            road_name: row.road_name,
            building_main: row.building_main,
            building_sub: row.building_sub,
            full_road_address: row.full_road_address,
            full_jibun_address: row.full_jibun_address,
            created_at,
        }
    }
}

/// Synthesises a record id as `{zip}_{unix millis}_{9 base-36 chars}`
pub fn generate_record_id(zip_code: &str) -> String {
    generate_record_id_at(zip_code, Utc::now().timestamp_millis(), &mut rand::thread_rng())
}

/// Same as [`generate_record_id`] with the clock and random source supplied
pub fn generate_record_id_at<R: Rng + ?Sized>(zip_code: &str, millis: i64, rng: &mut R) -> String {
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{zip_code}_{millis}_{suffix}")
}
