//! Oracle backend

pub mod adapter;
pub mod client;

pub use adapter::OracleAdapter;
pub use client::OracleClient;
