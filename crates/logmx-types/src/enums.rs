//! Common enumerations used throughout logmx.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::errors::{LogMxError, Result};

/// Logger severity level.
///
/// Levels are ordered from the most restrictive to the most verbose, so a
/// logger whose effective level is `L` emits every record whose level is
/// `<= L`. `Off` disables a logger entirely and `All` enables everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    /// No logging
    Off,
    /// Unrecoverable failures
    Fatal,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Detailed trace messages
    Trace,
    /// Everything
    All,
}

impl Level {
    /// Every level, from `Off` to `All`.
    pub const ALL_LEVELS: [Level; 8] = [
        Level::Off,
        Level::Fatal,
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Debug,
        Level::Trace,
        Level::All,
    ];

    /// Canonical (uppercase) name of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Off => "OFF",
            Level::Fatal => "FATAL",
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
            Level::All => "ALL",
        }
    }

    /// Parse a level name, treating an absent or unrecognized name as "no level".
    ///
    /// Management clients clear an explicit logger level by sending a null or
    /// unknown level name, so this never fails.
    ///
    /// ```
    /// use logmx_types::Level;
    ///
    /// assert_eq!(Level::from_name_lenient(Some("info")), Some(Level::Info));
    /// assert_eq!(Level::from_name_lenient(Some("chatty")), None);
    /// assert_eq!(Level::from_name_lenient(None), None);
    /// ```
    pub fn from_name_lenient(name: Option<&str>) -> Option<Level> {
        name.and_then(|n| n.trim().parse().ok())
    }

    /// The `tracing` level records of this severity are emitted at.
    ///
    /// `Off` is not a record level and has no mapping.
    pub fn as_tracing(&self) -> Option<tracing::Level> {
        match self {
            Level::Off => None,
            Level::Fatal | Level::Error => Some(tracing::Level::ERROR),
            Level::Warn => Some(tracing::Level::WARN),
            Level::Info => Some(tracing::Level::INFO),
            Level::Debug => Some(tracing::Level::DEBUG),
            Level::Trace | Level::All => Some(tracing::Level::TRACE),
        }
    }
}

impl FromStr for Level {
    type Err = LogMxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "OFF" => Ok(Level::Off),
            "FATAL" => Ok(Level::Fatal),
            "ERROR" => Ok(Level::Error),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "INFO" => Ok(Level::Info),
            "DEBUG" => Ok(Level::Debug),
            "TRACE" => Ok(Level::Trace),
            "ALL" => Ok(Level::All),
            _ => Err(LogMxError::Validation(format!("Invalid log level: {}", s))),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
