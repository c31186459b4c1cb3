//! Named loggers and logger factories.
//!
//! A [`Logger`] carries an optional explicit [`Level`] and a link to its
//! parent. Loggers without an explicit level inherit the level of the
//! nearest ancestor that has one; the root logger always has one.

use std::fmt;
use std::sync::{Arc, Weak};

use logmx_types::Level;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use tracing::warn;

use crate::repository::LoggerRepository;

/// Name reported by the root logger.
pub const ROOT_LOGGER_NAME: &str = "root";

/// Level the root logger starts with.
pub const DEFAULT_ROOT_LEVEL: Level = Level::Debug;

/// A named logging channel.
pub struct Logger {
    name: String,
    root: bool,
    level: RwLock<Option<Level>>,
    parent: RwLock<Option<Arc<Logger>>>,
    repository: OnceCell<Weak<dyn LoggerRepository>>,
}

impl Logger {
    /// Create a detached logger with no explicit level.
    ///
    /// Loggers only join a hierarchy through a [`LoggerRepository`]; this is
    /// what [`LoggerFactory`] implementations call.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: false,
            level: RwLock::new(None),
            parent: RwLock::new(None),
            repository: OnceCell::new(),
        }
    }

    pub(crate) fn new_root(level: Level) -> Self {
        Self {
            name: ROOT_LOGGER_NAME.to_string(),
            root: true,
            level: RwLock::new(Some(level)),
            parent: RwLock::new(None),
            repository: OnceCell::new(),
        }
    }

    /// Start with an explicit level.
    pub fn with_level(self, level: Level) -> Self {
        *self.level.write() = Some(level);
        self
    }

    /// Get the logger name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the root logger of its repository.
    pub fn is_root(&self) -> bool {
        self.root
    }

    /// Get the explicitly set level, if any.
    pub fn level(&self) -> Option<Level> {
        *self.level.read()
    }

    /// Set or clear the explicit level.
    ///
    /// The root logger must always have a level; clearing it is ignored.
    pub fn set_level(&self, level: Option<Level>) {
        if self.root && level.is_none() {
            warn!("Ignoring attempt to clear the root logger level");
            return;
        }
        *self.level.write() = level;
    }

    /// Get the parent logger. `None` only for the root or a detached logger.
    pub fn parent(&self) -> Option<Arc<Logger>> {
        self.parent.read().clone()
    }

    pub(crate) fn set_parent(&self, parent: Arc<Logger>) {
        *self.parent.write() = Some(parent);
    }

    /// Level in force for this logger: its own, or the nearest ancestor's.
    pub fn effective_level(&self) -> Level {
        if let Some(level) = self.level() {
            return level;
        }

        let mut current = self.parent();
        while let Some(logger) = current {
            if let Some(level) = logger.level() {
                return level;
            }
            current = logger.parent();
        }

        DEFAULT_ROOT_LEVEL
    }

    /// Whether a record at `level` would be emitted.
    pub fn is_enabled_for(&self, level: Level) -> bool {
        level != Level::Off && level <= self.effective_level()
    }

    /// The repository this logger belongs to, while it is alive.
    pub fn repository(&self) -> Option<Arc<dyn LoggerRepository>> {
        self.repository.get().and_then(|weak| weak.upgrade())
    }

    pub(crate) fn attach(&self, repository: Weak<dyn LoggerRepository>) {
        if self.repository.set(repository).is_err() {
            warn!(logger = %self.name, "Logger is already attached to a repository");
        }
    }

    /// Emit `message` at `level` if this logger is enabled for it.
    pub fn log(&self, level: Level, message: impl fmt::Display) {
        if !self.is_enabled_for(level) {
            return;
        }

        match level {
            Level::Off => {}
            Level::Fatal => tracing::error!(logger = %self.name, fatal = true, "{}", message),
            Level::Error => tracing::error!(logger = %self.name, "{}", message),
            Level::Warn => tracing::warn!(logger = %self.name, "{}", message),
            Level::Info => tracing::info!(logger = %self.name, "{}", message),
            Level::Debug => tracing::debug!(logger = %self.name, "{}", message),
            Level::Trace | Level::All => tracing::trace!(logger = %self.name, "{}", message),
        }
    }

    /// Log at `FATAL`.
    pub fn fatal(&self, message: impl fmt::Display) {
        self.log(Level::Fatal, message)
    }

    /// Log at `ERROR`.
    pub fn error(&self, message: impl fmt::Display) {
        self.log(Level::Error, message)
    }

    /// Log at `WARN`.
    pub fn warn(&self, message: impl fmt::Display) {
        self.log(Level::Warn, message)
    }

    /// Log at `INFO`.
    pub fn info(&self, message: impl fmt::Display) {
        self.log(Level::Info, message)
    }

    /// Log at `DEBUG`.
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Level::Debug, message)
    }

    /// Log at `TRACE`.
    pub fn trace(&self, message: impl fmt::Display) {
        self.log(Level::Trace, message)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("parent", &self.parent().map(|p| p.name().to_string()))
            .finish()
    }
}

/// Builds logger instances for a repository.
pub trait LoggerFactory: Send + Sync {
    /// Create a new, detached logger named `name`.
    fn make_new_logger_instance(&self, name: &str) -> Logger;
}

/// Factory producing loggers without an explicit level.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLoggerFactory;

impl LoggerFactory for DefaultLoggerFactory {
    fn make_new_logger_instance(&self, name: &str) -> Logger {
        Logger::new(name)
    }
}

/// Derive a dotted logger name from a type path.
///
/// ```
/// use logmx_core::logger_name_for;
///
/// struct Service;
/// assert!(logger_name_for::<Service>().ends_with(".Service"));
/// assert_eq!(logger_name_for::<Vec<u8>>(), "alloc.vec.Vec");
/// ```
pub fn logger_name_for<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let path = full.split('<').next().unwrap_or(full);
    path.replace("::", ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(levels: &[Option<Level>]) -> Vec<Arc<Logger>> {
        let root = Arc::new(Logger::new_root(DEFAULT_ROOT_LEVEL));
        let mut loggers = vec![root];
        for (i, level) in levels.iter().enumerate() {
            let logger = Logger::new(format!("l{}", i));
            if let Some(level) = level {
                *logger.level.write() = Some(*level);
            }
            logger.set_parent(loggers[i].clone());
            loggers.push(Arc::new(logger));
        }
        loggers
    }

    #[test]
    fn test_effective_level_walks_ancestors() {
        let loggers = chain(&[Some(Level::Warn), None, None]);
        assert_eq!(loggers[3].level(), None);
        assert_eq!(loggers[3].effective_level(), Level::Warn);
        assert_eq!(loggers[0].effective_level(), DEFAULT_ROOT_LEVEL);
    }

    #[test]
    fn test_effective_level_prefers_own_level() {
        let loggers = chain(&[Some(Level::Warn), Some(Level::Trace)]);
        assert_eq!(loggers[2].effective_level(), Level::Trace);
    }

    #[test]
    fn test_is_enabled_for() {
        let logger = Logger::new("a").with_level(Level::Info);
        assert!(logger.is_enabled_for(Level::Error));
        assert!(logger.is_enabled_for(Level::Info));
        assert!(!logger.is_enabled_for(Level::Debug));
        assert!(!logger.is_enabled_for(Level::Off));

        let silent = Logger::new("b").with_level(Level::Off);
        assert!(!silent.is_enabled_for(Level::Fatal));
    }

    #[test]
    fn test_root_level_cannot_be_cleared() {
        let root = Logger::new_root(Level::Info);
        root.set_level(None);
        assert_eq!(root.level(), Some(Level::Info));
        root.set_level(Some(Level::Error));
        assert_eq!(root.level(), Some(Level::Error));
    }

    #[test]
    fn test_detached_logger_has_no_repository() {
        let logger = Logger::new("detached");
        assert!(logger.repository().is_none());
        assert!(logger.parent().is_none());
        assert_eq!(logger.effective_level(), DEFAULT_ROOT_LEVEL);
    }

    #[test]
    fn test_logger_name_for_strips_generics() {
        assert_eq!(logger_name_for::<String>(), "alloc.string.String");
        assert_eq!(logger_name_for::<Option<String>>(), "core.option.Option");
        assert_eq!(logger_name_for::<u32>(), "u32");
    }
}
