//! MySQL backend
//!
//! Pooled through `mysql_async`; inserts use `INSERT IGNORE`.

pub mod adapter;
pub mod client;

pub use adapter::MySqlAdapter;
pub use client::MySqlClient;
