//! Logger repository abstraction.

use std::sync::Arc;

use crate::logger::{Logger, LoggerFactory};

/// A registry of named loggers with a distinguished root.
///
/// An empty name always refers to the root logger.
pub trait LoggerRepository: Send + Sync {
    /// Get the root logger.
    fn root_logger(&self) -> Arc<Logger>;

    /// Get the logger named `name`, creating it if needed.
    fn get_logger(&self, name: &str) -> Arc<Logger>;

    /// Get the logger named `name`, creating it with `factory` if needed.
    fn get_logger_with_factory(&self, name: &str, factory: &dyn LoggerFactory) -> Arc<Logger>;

    /// Get the logger named `name` only if it already exists.
    fn exists(&self, name: &str) -> Option<Arc<Logger>>;

    /// All loggers created so far, excluding the root.
    fn current_loggers(&self) -> Vec<Arc<Logger>>;
}
