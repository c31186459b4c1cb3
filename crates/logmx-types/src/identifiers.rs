//! Type-safe identifiers for the management registry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::errors::{LogMxError, Result};

/// Well-known object name the logging adapter is registered under.
pub const DEFAULT_OBJECT_NAME: &str = "logmx:type=Logging";

const RESERVED: &[char] = &[':', ',', '=', '*', '?'];

/// A validated management object name.
///
/// Object names have the form `domain:key=value[,key=value...]`:
/// - The domain is non-empty and does not contain `:`
/// - There is at least one key property
/// - Keys and values are non-empty and contain none of `: , = * ?`
/// - Keys are unique
///
/// Two names with the same properties in a different order are equal; the
/// canonical form lists keys in lexicographic order.
///
/// # Example
///
/// ```
/// use logmx_types::ObjectName;
///
/// let a = ObjectName::new("app:type=Logging,name=main").unwrap();
/// let b = ObjectName::new("app:name=main,type=Logging").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "app:name=main,type=Logging");
///
/// // Invalid names are rejected
/// assert!(ObjectName::new("no-properties").is_err());
/// assert!(ObjectName::new(":type=Logging").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectName {
    domain: String,
    properties: Vec<(String, String)>,
}

impl ObjectName {
    /// Parse and validate an object name.
    ///
    /// # Errors
    ///
    /// Returns [`LogMxError::InvalidObjectName`] if the name is malformed.
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref();

        let (domain, props) = name.split_once(':').ok_or_else(|| {
            LogMxError::InvalidObjectName(format!("'{}' has no domain separator", name))
        })?;

        if domain.is_empty() {
            crate::bail!(InvalidObjectName, "'{}' has an empty domain", name);
        }
        if props.is_empty() {
            crate::bail!(InvalidObjectName, "'{}' has no key properties", name);
        }

        let mut properties: Vec<(String, String)> = Vec::new();
        for pair in props.split(',') {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                LogMxError::InvalidObjectName(format!("'{}': property '{}' is not key=value", name, pair))
            })?;

            if !Self::is_valid_token(key) || !Self::is_valid_token(value) {
                crate::bail!(InvalidObjectName, "'{}': invalid property '{}'", name, pair);
            }
            if properties.iter().any(|(k, _)| k == key) {
                crate::bail!(InvalidObjectName, "'{}': duplicate key '{}'", name, key);
            }

            properties.push((key.to_string(), value.to_string()));
        }
        properties.sort();

        Ok(Self {
            domain: domain.to_string(),
            properties,
        })
    }

    /// The default name of the logging management adapter.
    pub fn logging() -> Self {
        Self {
            domain: "logmx".to_string(),
            properties: vec![("type".to_string(), "Logging".to_string())],
        }
    }

    fn is_valid_token(token: &str) -> bool {
        !token.is_empty() && !token.contains(RESERVED)
    }

    /// Get the domain part.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Get the value of a key property.
    pub fn key_property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl Default for ObjectName {
    fn default() -> Self {
        Self::logging()
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.domain)?;
        for (i, (key, value)) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

impl FromStr for ObjectName {
    type Err = LogMxError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ObjectName {
    type Error = LogMxError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ObjectName> for String {
    fn from(name: ObjectName) -> Self {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_object_name_validation() {
        assert!(ObjectName::new("logmx:type=Logging").is_ok());
        assert!(ObjectName::new("a.b.c:type=Logging,name=root").is_ok());

        assert!(ObjectName::new("logmx").is_err());
        assert!(ObjectName::new("logmx:").is_err());
        assert!(ObjectName::new(":type=Logging").is_err());
        assert!(ObjectName::new("logmx:type").is_err());
        assert!(ObjectName::new("logmx:type=").is_err());
        assert!(ObjectName::new("logmx:=Logging").is_err());
        assert!(ObjectName::new("logmx:type=Log*").is_err());
        assert!(ObjectName::new("logmx:type=a,type=b").is_err());
        assert!(ObjectName::new("logmx:type=a,,name=b").is_err());
    }

    #[test]
    fn test_default_name_matches_constant() {
        assert_eq!(ObjectName::logging(), ObjectName::new(DEFAULT_OBJECT_NAME).unwrap());
        assert_eq!(ObjectName::default().to_string(), DEFAULT_OBJECT_NAME);
    }

    #[test]
    fn test_key_property_lookup() {
        let name = ObjectName::new("app:type=Logging,name=main").unwrap();
        assert_eq!(name.domain(), "app");
        assert_eq!(name.key_property("name"), Some("main"));
        assert_eq!(name.key_property("missing"), None);
    }

    #[test]
    fn test_serde_as_string() {
        let name = ObjectName::new("app:type=Logging").unwrap();
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"app:type=Logging\"");
        assert!(serde_json::from_str::<ObjectName>("\"broken\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_property_order_is_irrelevant(
            domain in "[a-z][a-z.]{0,8}",
            keys in proptest::collection::btree_set("[a-z]{1,6}", 1..5),
        ) {
            let pairs: Vec<String> = keys.iter().map(|k| format!("{}=v{}", k, k.len())).collect();
            let forward = ObjectName::new(format!("{}:{}", domain, pairs.join(","))).unwrap();
            let reversed: Vec<String> = pairs.iter().rev().cloned().collect();
            let backward = ObjectName::new(format!("{}:{}", domain, reversed.join(","))).unwrap();

            prop_assert_eq!(&forward, &backward);
            prop_assert_eq!(ObjectName::new(forward.to_string()).unwrap(), forward);
        }
    }
}
