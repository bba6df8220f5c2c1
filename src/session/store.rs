use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe key-value capability backing the session registry.
///
/// Lifetime and eviction policy belong to the implementation; the
/// in-memory store keeps entries until they are deleted.
pub trait SessionStore<V>: Send + Sync {
    fn get(&self, id: &str) -> Option<Arc<V>>;

    fn put(&self, id: String, value: Arc<V>);

    /// Returns whether an entry was removed.
    fn delete(&self, id: &str) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct InMemorySessionStore<V> {
    entries: RwLock<HashMap<String, Arc<V>>>,
}

impl<V> InMemorySessionStore<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V> Default for InMemorySessionStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Send + Sync> SessionStore<V> for InMemorySessionStore<V> {
    fn get(&self, id: &str) -> Option<Arc<V>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(id).cloned()
    }

    fn put(&self, id: String, value: Arc<V>) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(id, value);
    }

    fn delete(&self, id: &str) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(id).is_some()
    }

    fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}
