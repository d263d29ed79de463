//! Process-lifetime fact memory.
//!
//! Facts are computed on first use and reused afterwards. Nothing is persisted;
//! the store dies with the conversation that owns it.

use std::collections::HashMap;

/// Key under which the creator-identity answer is cached.
pub const CREATOR_INFO: &str = "creator_info";

/// Owned string-to-string store, passed by reference to the responder.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Return the cached value for `key`, computing and storing it on first
    /// access. An existing value is never overwritten.
    pub fn get_or_insert_with(&mut self, key: &str, compute: impl FnOnce() -> String) -> &str {
        if !self.entries.contains_key(key) {
            let value = compute();
            tracing::debug!(key, "memory: storing fact");
            self.entries.insert(key.to_string(), value);
        }
        self.entries.get(key).map(String::as_str).unwrap_or_default()
    }

    /// Number of stored facts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_once() {
        let mut memory = MemoryStore::new();
        let mut calls = 0;
        let first = memory
            .get_or_insert_with(CREATOR_INFO, || {
                calls += 1;
                "Otaku Haven".into()
            })
            .to_string();
        let second = memory
            .get_or_insert_with(CREATOR_INFO, || {
                calls += 1;
                "someone else".into()
            })
            .to_string();

        assert_eq!(first, second);
        assert_eq!(calls, 1);
        assert_eq!(memory.len(), 1);
        assert_eq!(memory.get(CREATOR_INFO), Some("Otaku Haven"));
    }

    #[test]
    fn empty_store() {
        let memory = MemoryStore::default();
        assert!(memory.is_empty());
        assert!(!memory.contains(CREATOR_INFO));
        assert_eq!(memory.get("anything"), None);
    }
}
