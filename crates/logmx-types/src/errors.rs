//! Error types for logmx operations.

use thiserror::Error;

/// The main error type for logmx operations.
///
/// Registration failures are expected at runtime (a second registration under
/// the same object name is the common case) and are usually logged and
/// discarded by the façade rather than propagated.
#[derive(Error, Debug)]
pub enum LogMxError {
    /// Configuration-related error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A management object name could not be parsed
    #[error("Malformed object name: {0}")]
    InvalidObjectName(String),

    /// The object name is already bound in the management registry
    #[error("Instance already exists: {0}")]
    AlreadyRegistered(String),

    /// The object name is not bound in the management registry
    #[error("Instance not found: {0}")]
    NotRegistered(String),

    /// The logger is not attached to a live repository
    #[error("Logger '{0}' is not attached to a logger repository")]
    DetachedLogger(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl LogMxError {
    /// Whether this is the tolerated "name already bound" registration failure.
    pub fn is_already_registered(&self) -> bool {
        matches!(self, LogMxError::AlreadyRegistered(_))
    }
}

/// A specialized Result type for logmx operations.
pub type Result<T> = std::result::Result<T, LogMxError>;

/// Helper macro to bail out with a LogMxError
///
/// This is used for expected error conditions.
///
/// # Example
///
/// ```ignore
/// if domain.is_empty() {
///     bail!(InvalidObjectName, "empty domain in '{}'", name);
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($variant:ident, $msg:expr) => {
        return Err($crate::LogMxError::$variant($msg.to_string()))
    };
    ($variant:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::LogMxError::$variant(format!($fmt, $($arg)*)))
    };
    ($msg:expr) => {
        return Err($crate::LogMxError::Other($msg.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::LogMxError::Other(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reject(name: &str) -> Result<()> {
        crate::bail!(InvalidObjectName, "bad name '{}'", name);
    }

    #[test]
    fn test_bail_builds_variant() {
        let err = reject("x").unwrap_err();
        assert!(matches!(err, LogMxError::InvalidObjectName(ref m) if m == "bad name 'x'"));
        assert_eq!(err.to_string(), "Malformed object name: bad name 'x'");
    }

    #[test]
    fn test_already_registered_detection() {
        assert!(LogMxError::AlreadyRegistered("a:type=b".into()).is_already_registered());
        assert!(!LogMxError::NotRegistered("a:type=b".into()).is_already_registered());
    }
}
