// MDB - Multi-Database Postal Code API
// Copyright (c) 2025 MDB Contributors
// Licensed under the MIT License

//! # MDB - Multi-Database Postal Code API
//!
//! MDB exposes one HTTP surface for inserting, paging and health-checking postal-code
//! records across MySQL, PostgreSQL, MongoDB, SQLite and Oracle, so the engines can be
//! compared side by side.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`api`] - axum router, handlers and HTTP error mapping
//! - [`core`] - Import, read, stats and schema services
//! - [`adapters`] - One driver per storage engine plus the connection registry
//! - [`domain`] - Backend identity, postal records and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mdb::adapters::database::{ConfiguredDriverFactory, ConnectionRegistry};
//! use mdb::api::{router, AppState};
//! use mdb::config::load_config_or_default;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(load_config_or_default(None)?);
//!     let factory = Arc::new(ConfiguredDriverFactory::new(Arc::clone(&config)));
//!     let registry = Arc::new(ConnectionRegistry::new(factory));
//!
//!     let app = router(AppState::new(Arc::clone(&config), Arc::clone(&registry)));
//!     let listener = tokio::net::TcpListener::bind(config.server.bind_address()).await?;
//!     axum::serve(listener, app).await?;
//!
//!     registry.close_all().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Connection Lifecycle
//!
//! The [`ConnectionRegistry`](adapters::database::ConnectionRegistry) keeps at most one
//! handle per backend. `acquire` pings the cached handle and reconnects only when the
//! ping fails; `reset` always reconnects. Backends fail independently: one engine
//! being down never affects requests against another.
//!
//! ## Error Handling
//!
//! Library code returns [`domain::MdbError`]. HTTP responses carry only
//! [`MdbError::public_message`](domain::MdbError::public_message); the driver error is
//! logged.

pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
