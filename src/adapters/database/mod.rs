//! Database abstraction layer
//!
//! A trait every backend implements, a factory that opens handles from configuration
//! and the registry that caches them.

pub mod blocking;
pub mod factory;
pub mod registry;
pub mod traits;

pub use factory::{create_driver, ConfiguredDriverFactory, DriverFactory};
pub use registry::{ConnectionRegistry, HealthStatus, CONNECTING_REASON, DEFAULT_CONNECT_TIMEOUT};
pub use traits::{BackendDriver, InsertOutcome, Page, SchemaMode, POSTAL_TABLE};
