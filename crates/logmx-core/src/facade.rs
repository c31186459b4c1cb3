//! Logger retrieval with management registration.
//!
//! [`ManagedLoggers`] hands out loggers from a repository and makes sure a
//! [`Logging`] adapter for that repository is registered with the management
//! registry under a well-known [`ObjectName`]. Registration is best-effort:
//! a failure is logged and the logger is returned anyway, so management
//! visibility never gets in the way of application logging.
//!
//! ```
//! use logmx_core::{Hierarchy, ManagedLoggers, PlatformRegistry};
//! use logmx_types::ObjectName;
//! use std::sync::Arc;
//!
//! let loggers = ManagedLoggers::new(Hierarchy::new(), Arc::new(PlatformRegistry::new()))
//!     .with_object_name(ObjectName::new("orders:type=Logging").unwrap());
//!
//! let logger = loggers.get_logger("orders.checkout");
//! assert_eq!(logger.name(), "orders.checkout");
//! ```

use std::sync::Arc;

use logmx_types::{LogMxError, LoggingManagement, ManagementRegistry, ObjectName, Result};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::ManagementConfig;
use crate::hierarchy::Hierarchy;
use crate::logger::{logger_name_for, Logger, LoggerFactory};
use crate::management::Logging;
use crate::registry::PlatformRegistry;
use crate::repository::LoggerRepository;

/// Registration façade over a logger repository and a management registry.
pub struct ManagedLoggers {
    repository: Arc<dyn LoggerRepository>,
    registry: Arc<dyn ManagementRegistry>,
    object_name: ObjectName,
    registration: Mutex<()>,
}

impl ManagedLoggers {
    /// Create a façade registering under [`ObjectName::logging`].
    pub fn new(repository: Arc<dyn LoggerRepository>, registry: Arc<dyn ManagementRegistry>) -> Self {
        Self {
            repository,
            registry,
            object_name: ObjectName::logging(),
            registration: Mutex::new(()),
        }
    }

    /// Register under a different object name.
    pub fn with_object_name(mut self, object_name: ObjectName) -> Self {
        self.object_name = object_name;
        self
    }

    /// Create a façade from configuration, applying its initial levels.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured object name is malformed.
    pub fn from_config(
        repository: Arc<dyn LoggerRepository>,
        registry: Arc<dyn ManagementRegistry>,
        config: &ManagementConfig,
    ) -> Result<Self> {
        let object_name = ObjectName::new(&config.object_name)?;

        let adapter = Logging::new(repository.clone());
        for (logger_name, level) in &config.levels {
            adapter.set_logger_level(logger_name, Some(level.as_str()));
        }
        debug!(levels = config.levels.len(), "Applied configured logger levels");

        Ok(Self::new(repository, registry).with_object_name(object_name))
    }

    /// Get the process-wide façade.
    ///
    /// It serves loggers from [`Hierarchy::global`] and registers with
    /// [`PlatformRegistry::global`] under the default object name.
    pub fn global() -> &'static ManagedLoggers {
        static INSTANCE: Lazy<ManagedLoggers> =
            Lazy::new(|| ManagedLoggers::new(Hierarchy::global(), PlatformRegistry::global()));
        &INSTANCE
    }

    /// Object name the adapter is registered under.
    pub fn object_name(&self) -> &ObjectName {
        &self.object_name
    }

    /// The repository loggers are served from.
    pub fn repository(&self) -> &Arc<dyn LoggerRepository> {
        &self.repository
    }

    /// The registry adapters are registered with.
    pub fn registry(&self) -> &Arc<dyn ManagementRegistry> {
        &self.registry
    }

    /// Register a management adapter for `logger`'s repository.
    ///
    /// Calls are serialized. A second registration under the same name fails
    /// with [`LogMxError::AlreadyRegistered`] and leaves the first in place.
    ///
    /// # Errors
    ///
    /// Returns [`LogMxError::DetachedLogger`] if the logger's repository is
    /// gone, or whatever the registry reports.
    pub fn try_register(&self, logger: &Logger) -> Result<()> {
        let _guard = self.registration.lock();

        let repository = logger
            .repository()
            .ok_or_else(|| LogMxError::DetachedLogger(logger.name().to_string()))?;

        let bean: Arc<dyn LoggingManagement> = Arc::new(Logging::new(repository));
        self.registry.register(&self.object_name, bean)?;

        info!(object_name = %self.object_name, "Registered logging management adapter");
        Ok(())
    }

    /// Best-effort [`try_register`](Self::try_register); failures are logged.
    pub fn register(&self, logger: &Logger) {
        match self.try_register(logger) {
            Ok(()) => {}
            Err(e) if e.is_already_registered() => {
                debug!(object_name = %self.object_name, "Logging management adapter already registered");
            }
            Err(e) => {
                warn!(logger = logger.name(), "Failed to register logging management adapter: {}", e);
            }
        }
    }

    /// Get the logger named `name` and make sure the adapter is registered.
    pub fn get_logger(&self, name: &str) -> Arc<Logger> {
        let logger = self.repository.get_logger(name);
        self.register(&logger);
        logger
    }

    /// Get the logger named after type `T` (see [`logger_name_for`]).
    pub fn get_logger_for<T: ?Sized>(&self) -> Arc<Logger> {
        self.get_logger(&logger_name_for::<T>())
    }

    /// Get the logger named `name`, building it with `factory` if it is new.
    pub fn get_logger_with_factory(&self, name: &str, factory: &dyn LoggerFactory) -> Arc<Logger> {
        let logger = self.repository.get_logger_with_factory(name, factory);
        self.register(&logger);
        logger
    }
}
