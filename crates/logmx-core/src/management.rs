//! Management adapter over a logger repository.

use std::sync::Arc;

use logmx_types::{Level, LoggingManagement};
use tracing::debug;

use crate::logger::Logger;
use crate::repository::LoggerRepository;

/// Exposes one [`LoggerRepository`] through the [`LoggingManagement`] contract.
///
/// Instances are normally created by
/// [`ManagedLoggers::register`](crate::ManagedLoggers::register) and reached
/// through the management registry.
///
/// Read operations never create loggers, so querying an unknown name does not
/// change what [`get_logger_names`](LoggingManagement::get_logger_names)
/// reports. Setting a level creates the logger if needed.
pub struct Logging {
    repository: Arc<dyn LoggerRepository>,
}

impl Logging {
    /// Create an adapter bound to `repository`.
    pub fn new(repository: Arc<dyn LoggerRepository>) -> Self {
        Self { repository }
    }

    fn existing(&self, logger_name: &str) -> Option<Arc<Logger>> {
        if logger_name.is_empty() {
            Some(self.repository.root_logger())
        } else {
            self.repository.exists(logger_name)
        }
    }

    fn resolve(&self, logger_name: &str) -> Arc<Logger> {
        if logger_name.is_empty() {
            self.repository.root_logger()
        } else {
            self.repository.get_logger(logger_name)
        }
    }
}

impl LoggingManagement for Logging {
    fn get_logger_level(&self, logger_name: &str) -> Option<String> {
        self.existing(logger_name)?
            .level()
            .map(|level| level.to_string())
    }

    fn set_logger_level(&self, logger_name: &str, level_name: Option<&str>) {
        let logger = self.resolve(logger_name);
        let level = Level::from_name_lenient(level_name);
        debug!(logger = logger.name(), ?level, "Setting logger level");
        logger.set_level(level);
    }

    fn get_parent_logger_name(&self, logger_name: &str) -> Option<String> {
        let parent = self.existing(logger_name)?.parent()?;
        if parent.is_root() {
            Some(String::new())
        } else {
            Some(parent.name().to_string())
        }
    }

    fn get_logger_names(&self) -> Vec<String> {
        self.repository
            .current_loggers()
            .iter()
            .map(|logger| logger.name().to_string())
            .collect()
    }
}
