//! # logmx Core
//!
//! Runtime management of a hierarchical logger registry.
//!
//! This crate provides:
//!
//! - **Loggers**: named, dotted-hierarchy loggers with inherited levels
//! - **Hierarchy**: the logger repository (lookup-or-create, root logger,
//!   enumeration of current loggers)
//! - **Management**: the [`Logging`] adapter exposing names, levels, and
//!   parents through the [`LoggingManagement`] contract
//! - **Registry**: an in-process management registry
//! - **Façade**: logger retrieval that registers the adapter on first use
//! - **Configuration**: layered YAML/environment configuration
//! - **Logging**: `tracing` subscriber setup
//!
//! ## Example
//!
//! ```rust
//! use logmx_core::{ManagedLoggers, Hierarchy, PlatformRegistry};
//! use logmx_types::{LoggingManagement, ManagementRegistry, ObjectName};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(PlatformRegistry::new());
//! let loggers = ManagedLoggers::new(Hierarchy::new(), registry.clone());
//!
//! let logger = loggers.get_logger("app.db");
//! logger.info("connected");
//!
//! let bean = registry.lookup(&ObjectName::logging()).unwrap();
//! bean.set_logger_level("app.db", Some("TRACE"));
//! assert_eq!(bean.get_logger_level("app.db").as_deref(), Some("TRACE"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod facade;
pub mod hierarchy;
pub mod log;
pub mod logger;
pub mod management;
pub mod registry;
pub mod repository;

use std::sync::Arc;

// Re-export commonly used items
pub use config::{Config, ManagementConfig};
pub use facade::ManagedLoggers;
pub use hierarchy::Hierarchy;
pub use logger::{logger_name_for, DefaultLoggerFactory, Logger, LoggerFactory};
pub use management::Logging;
pub use registry::PlatformRegistry;
pub use repository::LoggerRepository;
pub use logmx_types::{Level, LogMxError, LoggingManagement, ManagementRegistry, ObjectName, Result};

/// logmx version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Register the logging management adapter for `logger`'s repository with the
/// process-wide registry.
///
/// Failures are logged and discarded.
pub fn register(logger: &Logger) {
    ManagedLoggers::global().register(logger)
}

/// Retrieve a logger from the process-wide hierarchy, registering the
/// management adapter on first use.
pub fn get_logger(name: &str) -> Arc<Logger> {
    ManagedLoggers::global().get_logger(name)
}

/// Retrieve the logger named after type `T` (`a::b::Type` becomes `a.b.Type`).
pub fn get_logger_for<T: ?Sized>() -> Arc<Logger> {
    ManagedLoggers::global().get_logger_for::<T>()
}

/// Retrieve a logger, building it with `factory` if it does not exist yet.
pub fn get_logger_with_factory(name: &str, factory: &dyn LoggerFactory) -> Arc<Logger> {
    ManagedLoggers::global().get_logger_with_factory(name, factory)
}
