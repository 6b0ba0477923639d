//! Domain models and types for MDB.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Backend identity** ([`BackendKind`]) with the static [`BackendInfo`] catalogue
//! - **Postal records** in their input ([`PostalRecord`]), normalised ([`PostalRow`])
//!   and stored ([`StoredPostalRecord`]) forms
//! - **Error types** ([`MdbError`], [`BackendError`])
//! - **Result type alias** ([`Result`])
//!
//! # Example
//!
//! ```rust
//! use mdb::domain::{BackendKind, PostalRecord};
//!
//! # fn example() -> mdb::domain::Result<()> {
//! let kind: BackendKind = "sqlite".parse()?;
//! let row = PostalRecord::new("25627")
//!     .with_region("강원특별자치도", "강릉시", "")
//!     .to_row();
//!
//! assert_eq!(kind, BackendKind::Sqlite);
//! assert!(row.id.starts_with("25627_"));
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod context;
pub mod errors;
pub mod postal;
pub mod result;

pub use backend::{BackendInfo, BackendKind};
pub use errors::{BackendError, MdbError};
pub use postal::{generate_record_id, PostalRecord, PostalRow, StoredPostalRecord};
pub use result::Result;
