//! Name-to-executor registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::handler::CapabilityHandler;

/// Maps capability names to their executors.
///
/// Lookups are exact string matches. Re-registering a name replaces the
/// previous executor; last write wins.
#[derive(Default)]
pub struct ExecutorRegistry {
    handlers: RwLock<HashMap<String, Arc<dyn CapabilityHandler>>>,
}

impl ExecutorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under every name in `names`.
    pub fn register(&self, names: &[&str], handler: Arc<dyn CapabilityHandler>) {
        let mut handlers = self.handlers.write();
        for name in names {
            if handlers.insert(name.to_string(), Arc::clone(&handler)).is_some() {
                tracing::debug!(tool = %name, "replacing registered executor");
            }
        }
    }

    pub fn resolve(&self, name: &str) -> Option<Arc<dyn CapabilityHandler>> {
        self.handlers.read().get(name).cloned()
    }

    /// Registered names, sorted for stable listings.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.read().keys().cloned().collect();
        names.sort();
        names
    }
}
