use crate::identity_hash::IdentityHashTable;
use crate::registry::{ClassRegistry, InternedClassRegistry};
use std::sync::Arc;

/// Runtime state the identity shim reads and updates.
pub struct RuntimeContext {
    identity_hashes: IdentityHashTable,
    registry: Arc<dyn ClassRegistry>,
}

impl Default for RuntimeContext {
    fn default() -> Self {
        Self::new(Arc::new(InternedClassRegistry::new()))
    }
}

impl RuntimeContext {
    pub fn new(registry: Arc<dyn ClassRegistry>) -> Self {
        RuntimeContext {
            identity_hashes: IdentityHashTable::new(),
            registry,
        }
    }

    pub fn registry(&self) -> &dyn ClassRegistry {
        self.registry.as_ref()
    }

    pub fn identity_hashes(&self) -> &IdentityHashTable {
        &self.identity_hashes
    }

    pub fn reset(&self) {
        self.identity_hashes.reset();
    }
}
