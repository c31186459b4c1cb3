//! # logmx Types
//!
//! Core types, traits, and enums shared across the logmx crates.
//!
//! This crate provides the fundamental building blocks for exposing a logger
//! registry to management clients, including:
//!
//! - The ordered severity [`Level`] with lenient and strict parsing
//! - Validated management [`ObjectName`]s
//! - The [`LoggingManagement`] contract and the [`ManagementRegistry`] seam
//! - Error types and result aliases
//!
//! ## Example
//!
//! ```
//! use logmx_types::{Level, ObjectName};
//!
//! let level: Level = "warn".parse().unwrap();
//! assert_eq!(level.to_string(), "WARN");
//!
//! let name = ObjectName::new("logmx:type=Logging").unwrap();
//! assert_eq!(name.domain(), "logmx");
//! assert_eq!(name.key_property("type"), Some("Logging"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod identifiers;
pub mod enums;
pub mod traits;
pub mod config;

// Re-export common types for convenience
pub use errors::{LogMxError, Result};
pub use identifiers::{ObjectName, DEFAULT_OBJECT_NAME};
pub use enums::Level;
pub use traits::{LoggingManagement, ManagementRegistry};
