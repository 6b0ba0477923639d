//! PostgreSQL backend
//!
//! Pooled through deadpool; inserts use `ON CONFLICT (id) DO NOTHING`.

pub mod adapter;
pub mod client;

pub use adapter::PostgreSQLAdapter;
pub use client::PostgreSQLClient;
