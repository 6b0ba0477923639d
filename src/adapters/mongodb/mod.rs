//! MongoDB backend
//!
//! Stores one document per record in `postal_codes`; duplicates surface as
//! duplicate-key write errors.

pub mod adapter;
pub mod client;

pub use adapter::MongoDbAdapter;
pub use client::MongoDbClient;
