//! Hierarchical logger repository.
//!
//! Loggers are arranged by dotted name: `app.db.pool` is a descendant of
//! `app.db` and `app`. A logger's parent is its nearest *existing* ancestor,
//! or the root. Ancestors created later adopt the descendants that were
//! waiting on them, so the parent links stay correct regardless of creation
//! order.

use std::sync::{Arc, Weak};

use indexmap::map::Entry;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::logger::{DefaultLoggerFactory, Logger, LoggerFactory, DEFAULT_ROOT_LEVEL};
use crate::repository::LoggerRepository;

enum Node {
    Logger(Arc<Logger>),
    /// Loggers whose dotted ancestor of this name does not exist yet.
    Provision(Vec<Arc<Logger>>),
}

/// The default [`LoggerRepository`].
pub struct Hierarchy {
    root: Arc<Logger>,
    table: RwLock<IndexMap<String, Node>>,
    this: Weak<Hierarchy>,
}

impl Hierarchy {
    /// Create an empty hierarchy containing only the root logger.
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|this: &Weak<Hierarchy>| {
            let root = Arc::new(Logger::new_root(DEFAULT_ROOT_LEVEL));
            let repository: Weak<dyn LoggerRepository> = this.clone();
            root.attach(repository);

            Self {
                root,
                table: RwLock::new(IndexMap::new()),
                this: this.clone(),
            }
        })
    }

    /// Get the process-wide hierarchy.
    pub fn global() -> Arc<Hierarchy> {
        static INSTANCE: Lazy<Arc<Hierarchy>> = Lazy::new(Hierarchy::new);
        INSTANCE.clone()
    }

    /// Clear every explicit level and restore the root to its default.
    pub fn reset_levels(&self) {
        for logger in self.current_loggers() {
            logger.set_level(None);
        }
        self.root.set_level(Some(DEFAULT_ROOT_LEVEL));
    }

    /// Number of loggers created so far, excluding the root.
    pub fn len(&self) -> usize {
        self.table
            .read()
            .values()
            .filter(|node| matches!(node, Node::Logger(_)))
            .count()
    }

    /// Whether only the root logger exists.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Link `logger` to its nearest existing ancestor, registering it with
    // every missing ancestor on the way up.
    fn update_parents(&self, table: &mut IndexMap<String, Node>, logger: &Arc<Logger>) {
        let name = logger.name();

        for (idx, _) in name.rmatch_indices('.') {
            let prefix = &name[..idx];
            if prefix.is_empty() {
                continue;
            }

            match table.entry(prefix.to_string()) {
                Entry::Occupied(mut entry) => match entry.get_mut() {
                    Node::Logger(parent) => {
                        logger.set_parent(parent.clone());
                        return;
                    }
                    Node::Provision(waiting) => waiting.push(logger.clone()),
                },
                Entry::Vacant(entry) => {
                    entry.insert(Node::Provision(vec![logger.clone()]));
                }
            }
        }

        logger.set_parent(self.root.clone());
    }

    // `logger` was just created where descendants were waiting: insert it
    // between each of them and their current parent.
    fn update_children(children: &[Arc<Logger>], logger: &Arc<Logger>) {
        for child in children {
            let Some(parent) = child.parent() else {
                continue;
            };

            if !Self::is_below(&parent, logger.name()) {
                logger.set_parent(parent);
                child.set_parent(logger.clone());
            }
        }
    }

    fn is_below(logger: &Logger, ancestor: &str) -> bool {
        !logger.is_root()
            && logger
                .name()
                .strip_prefix(ancestor)
                .map_or(false, |rest| rest.starts_with('.'))
    }
}

impl LoggerRepository for Hierarchy {
    fn root_logger(&self) -> Arc<Logger> {
        self.root.clone()
    }

    fn get_logger(&self, name: &str) -> Arc<Logger> {
        self.get_logger_with_factory(name, &DefaultLoggerFactory)
    }

    fn get_logger_with_factory(&self, name: &str, factory: &dyn LoggerFactory) -> Arc<Logger> {
        if let Some(logger) = self.exists(name) {
            return logger;
        }

        // The factory may call back into this repository, so it runs unlocked.
        let created = factory.make_new_logger_instance(name);

        let mut table = self.table.write();

        // Another thread may have created it in the meantime; `created` is dropped.
        if let Some(Node::Logger(logger)) = table.get(name) {
            return logger.clone();
        }

        let logger = Arc::new(created);
        let repository: Weak<dyn LoggerRepository> = self.this.clone();
        logger.attach(repository);

        if let Some(Node::Provision(children)) = table.insert(name.to_string(), Node::Logger(logger.clone())) {
            Self::update_children(&children, &logger);
        }
        self.update_parents(&mut table, &logger);

        debug!(logger = name, "Created logger");
        logger
    }

    fn exists(&self, name: &str) -> Option<Arc<Logger>> {
        if name.is_empty() {
            return Some(self.root.clone());
        }

        match self.table.read().get(name) {
            Some(Node::Logger(logger)) => Some(logger.clone()),
            _ => None,
        }
    }

    fn current_loggers(&self) -> Vec<Arc<Logger>> {
        self.table
            .read()
            .values()
            .filter_map(|node| match node {
                Node::Logger(logger) => Some(logger.clone()),
                Node::Provision(_) => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logmx_types::Level;
    use std::collections::HashSet;
    use std::thread;

    fn parent_name(logger: &Logger) -> String {
        logger.parent().map(|p| p.name().to_string()).unwrap_or_default()
    }

    #[test]
    fn test_lookup_or_create_returns_same_instance() {
        let hierarchy = Hierarchy::new();
        let a = hierarchy.get_logger("app");
        let b = hierarchy.get_logger("app");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(hierarchy.len(), 1);
    }

    #[test]
    fn test_empty_name_is_root() {
        let hierarchy = Hierarchy::new();
        let root = hierarchy.get_logger("");
        assert!(root.is_root());
        assert!(Arc::ptr_eq(&root, &hierarchy.root_logger()));
        assert!(hierarchy.is_empty());
    }

    #[test]
    fn test_parent_is_nearest_existing_ancestor() {
        let hierarchy = Hierarchy::new();
        hierarchy.get_logger("app");
        let pool = hierarchy.get_logger("app.db.pool");
        assert_eq!(parent_name(&pool), "app");

        let top = hierarchy.get_logger("other");
        assert!(top.parent().unwrap().is_root());
    }

    #[test]
    fn test_late_ancestor_adopts_waiting_descendants() {
        let hierarchy = Hierarchy::new();
        let pool = hierarchy.get_logger("app.db.pool");
        let cache = hierarchy.get_logger("app.cache");
        assert!(pool.parent().unwrap().is_root());

        let app = hierarchy.get_logger("app");
        assert_eq!(parent_name(&pool), "app");
        assert_eq!(parent_name(&cache), "app");
        assert!(app.parent().unwrap().is_root());

        let db = hierarchy.get_logger("app.db");
        assert_eq!(parent_name(&pool), "app.db");
        assert_eq!(parent_name(&db), "app");
        assert_eq!(parent_name(&cache), "app");
    }

    #[test]
    fn test_prefix_that_is_not_an_ancestor() {
        let hierarchy = Hierarchy::new();
        let child = hierarchy.get_logger("ro.a");
        hierarchy.get_logger("ro");
        assert_eq!(parent_name(&child), "ro");

        let sibling = hierarchy.get_logger("app2.x");
        hierarchy.get_logger("app");
        assert!(sibling.parent().unwrap().is_root());
    }

    #[test]
    fn test_level_inheritance_through_hierarchy() {
        let hierarchy = Hierarchy::new();
        let pool = hierarchy.get_logger("app.db.pool");
        hierarchy.root_logger().set_level(Some(Level::Error));
        assert_eq!(pool.effective_level(), Level::Error);

        hierarchy.get_logger("app").set_level(Some(Level::Trace));
        assert_eq!(pool.effective_level(), Level::Trace);
    }

    #[test]
    fn test_current_loggers_excludes_root_and_provisions() {
        let hierarchy = Hierarchy::new();
        hierarchy.get_logger("a.b.c");
        hierarchy.get_logger("x");

        let names: Vec<String> = hierarchy
            .current_loggers()
            .iter()
            .map(|l| l.name().to_string())
            .collect();
        assert_eq!(names, vec!["a.b.c", "x"]);
        assert!(hierarchy.exists("a.b").is_none());
    }

    #[test]
    fn test_factory_builds_new_loggers_only() {
        struct Verbose;
        impl LoggerFactory for Verbose {
            fn make_new_logger_instance(&self, name: &str) -> Logger {
                Logger::new(name).with_level(Level::Trace)
            }
        }

        let hierarchy = Hierarchy::new();
        let existing = hierarchy.get_logger("existing");
        let same = hierarchy.get_logger_with_factory("existing", &Verbose);
        assert!(Arc::ptr_eq(&existing, &same));
        assert_eq!(same.level(), None);

        let fresh = hierarchy.get_logger_with_factory("fresh", &Verbose);
        assert_eq!(fresh.level(), Some(Level::Trace));
        assert!(fresh.repository().is_some());
    }

    #[test]
    fn test_factory_may_use_the_repository() {
        struct Audited(Arc<Hierarchy>);
        impl LoggerFactory for Audited {
            fn make_new_logger_instance(&self, name: &str) -> Logger {
                let audit = self.0.get_logger("audit");
                Logger::new(name).with_level(audit.effective_level())
            }
        }

        let hierarchy = Hierarchy::new();
        let (tx, rx) = std::sync::mpsc::channel();
        let factory = Audited(hierarchy.clone());
        let worker = hierarchy.clone();
        thread::spawn(move || {
            let logger = worker.get_logger_with_factory("svc", &factory);
            let _ = tx.send(logger);
        });

        let svc = rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("factory calling back into the hierarchy must not block");
        assert_eq!(svc.level(), Some(DEFAULT_ROOT_LEVEL));
        assert!(hierarchy.exists("audit").is_some());
        assert!(Arc::ptr_eq(&svc, &hierarchy.get_logger("svc")));
    }

    #[test]
    fn test_reset_levels() {
        let hierarchy = Hierarchy::new();
        hierarchy.get_logger("a").set_level(Some(Level::Warn));
        hierarchy.root_logger().set_level(Some(Level::Off));

        hierarchy.reset_levels();
        assert_eq!(hierarchy.get_logger("a").level(), None);
        assert_eq!(hierarchy.root_logger().level(), Some(DEFAULT_ROOT_LEVEL));
    }

    #[test]
    fn test_loggers_outlive_dropped_repository_detached() {
        let hierarchy = Hierarchy::new();
        let logger = hierarchy.get_logger("a");
        assert!(logger.repository().is_some());
        drop(hierarchy);
        assert!(logger.repository().is_none());
    }

    #[test]
    fn test_concurrent_creation_yields_one_instance_per_name() {
        let hierarchy = Hierarchy::new();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let hierarchy = hierarchy.clone();
                thread::spawn(move || {
                    let names = ["svc.a", "svc.b", "svc", "svc.a.x"];
                    names
                        .iter()
                        .cycle()
                        .skip(i)
                        .take(names.len())
                        .map(|n| hierarchy.get_logger(n))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let names: HashSet<String> = hierarchy
            .current_loggers()
            .iter()
            .map(|l| l.name().to_string())
            .collect();
        assert_eq!(names.len(), 4);
        assert_eq!(parent_name(&hierarchy.get_logger("svc.a.x")), "svc.a");
        assert_eq!(parent_name(&hierarchy.get_logger("svc.a")), "svc");
    }
}
