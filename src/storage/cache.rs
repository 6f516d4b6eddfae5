use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Maps event-source hashes back to calendar ids for the lifetime of a
/// session. Rebuilt on every event-source listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceHashCache {
    entries: HashMap<String, String>,
}

impl SourceHashCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, hash: String, calendar_id: String) {
        self.entries.insert(hash, calendar_id);
    }

    pub fn resolve(&self, hash: &str) -> Option<&str> {
        self.entries.get(hash).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
