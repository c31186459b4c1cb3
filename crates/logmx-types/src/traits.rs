//! Core trait definitions for logmx abstractions.

use std::sync::Arc;
use crate::errors::Result;
use crate::identifiers::ObjectName;

/// Runtime management contract for a logger registry.
///
/// This is the surface generic management tooling operates on. In every
/// operation an empty logger name addresses the root logger, not a logger
/// literally named `""`.
pub trait LoggingManagement: Send + Sync {
    /// Get the canonical name of the logger's explicitly set level.
    ///
    /// Returns `None` when the level is unset (inherited from an ancestor) or
    /// when no logger with that name has been created.
    fn get_logger_level(&self, logger_name: &str) -> Option<String>;

    /// Set or clear a logger's explicit level.
    ///
    /// An absent or unrecognized `level_name` clears the explicit level so the
    /// logger inherits from its ancestors again.
    fn set_logger_level(&self, logger_name: &str, level_name: Option<&str>);

    /// Get the name of the logger's parent.
    ///
    /// The root logger is reported as `""`. The root itself has no parent,
    /// so `None` is returned for it and for loggers that do not exist.
    fn get_parent_logger_name(&self, logger_name: &str) -> Option<String>;

    /// List the names of all currently instantiated loggers.
    ///
    /// The order follows the underlying registry and is not guaranteed to be
    /// stable across calls.
    fn get_logger_names(&self) -> Vec<String>;
}

/// Registry of named management objects.
///
/// Production code binds this to the process-wide registry; tests inject
/// their own instance.
pub trait ManagementRegistry: Send + Sync {
    /// Bind a management object under `name`.
    ///
    /// Fails with [`crate::LogMxError::AlreadyRegistered`] if the name is taken.
    fn register(&self, name: &ObjectName, bean: Arc<dyn LoggingManagement>) -> Result<()>;

    /// Remove the object bound under `name`.
    ///
    /// Fails with [`crate::LogMxError::NotRegistered`] if nothing is bound.
    fn unregister(&self, name: &ObjectName) -> Result<()>;

    /// Look up the object bound under `name`.
    fn lookup(&self, name: &ObjectName) -> Option<Arc<dyn LoggingManagement>>;

    /// Check whether `name` is bound.
    fn is_registered(&self, name: &ObjectName) -> bool {
        self.lookup(name).is_some()
    }

    /// All bound names.
    fn names(&self) -> Vec<ObjectName>;
}
