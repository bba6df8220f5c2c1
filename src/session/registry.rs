use std::sync::Arc;

use super::store::SessionStore;
use crate::rag::RagPipeline;

const SESSION_ID_BYTES: usize = 8;

/// Maps opaque session ids to ingested document pipelines.
///
/// Ids are random and never checked for collisions; 64 bits of entropy is
/// plenty for a process-lifetime map.
#[derive(Clone)]
pub struct SessionRegistry {
    store: Arc<dyn SessionStore<RagPipeline>>,
}

impl SessionRegistry {
    pub fn new(store: Arc<dyn SessionStore<RagPipeline>>) -> Self {
        Self { store }
    }

    pub fn create(&self, pipeline: RagPipeline) -> String {
        let session_id = generate_session_id();
        self.store.put(session_id.clone(), Arc::new(pipeline));
        session_id
    }

    pub fn get(&self, session_id: &str) -> Option<Arc<RagPipeline>> {
        self.store.get(session_id)
    }

    pub fn remove(&self, session_id: &str) -> bool {
        self.store.delete(session_id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

fn generate_session_id() -> String {
    let bytes: [u8; SESSION_ID_BYTES] = rand::random();
    hex::encode(bytes)
}
