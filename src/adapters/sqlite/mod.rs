//! SQLite backend
//!
//! Embedded file database; inserts use `INSERT OR IGNORE`.

pub mod adapter;
pub mod client;

pub use adapter::SqliteAdapter;
pub use client::SqliteClient;
