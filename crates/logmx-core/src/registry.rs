//! In-process management registry.

use std::collections::HashMap;
use std::sync::Arc;

use logmx_types::{LogMxError, LoggingManagement, ManagementRegistry, ObjectName, Result};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

/// A [`ManagementRegistry`] holding management objects in memory.
#[derive(Default)]
pub struct PlatformRegistry {
    beans: RwLock<HashMap<ObjectName, Arc<dyn LoggingManagement>>>,
}

impl PlatformRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the process-wide registry.
    pub fn global() -> Arc<PlatformRegistry> {
        static INSTANCE: Lazy<Arc<PlatformRegistry>> = Lazy::new(|| Arc::new(PlatformRegistry::new()));
        INSTANCE.clone()
    }

    /// Number of bound objects.
    pub fn len(&self) -> usize {
        self.beans.read().len()
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.beans.read().is_empty()
    }
}

impl ManagementRegistry for PlatformRegistry {
    fn register(&self, name: &ObjectName, bean: Arc<dyn LoggingManagement>) -> Result<()> {
        let mut beans = self.beans.write();
        if beans.contains_key(name) {
            return Err(LogMxError::AlreadyRegistered(name.to_string()));
        }

        beans.insert(name.clone(), bean);
        debug!(object_name = %name, "Registered management object");
        Ok(())
    }

    fn unregister(&self, name: &ObjectName) -> Result<()> {
        match self.beans.write().remove(name) {
            Some(_) => {
                debug!(object_name = %name, "Unregistered management object");
                Ok(())
            }
            None => Err(LogMxError::NotRegistered(name.to_string())),
        }
    }

    fn lookup(&self, name: &ObjectName) -> Option<Arc<dyn LoggingManagement>> {
        self.beans.read().get(name).cloned()
    }

    fn names(&self) -> Vec<ObjectName> {
        self.beans.read().keys().cloned().collect()
    }
}
