// src/store.rs
//
// Explicit key-value store for completed session results, keyed by the
// opaque source id. Passed to whoever needs lookup instead of living as
// module-global state; the Mutex makes it shareable across concurrent
// sessions on different videos.

use crate::types::SessionResult;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub struct ResultStore {
    inner: Mutex<HashMap<String, Arc<SessionResult>>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a completed result, replacing any previous run for the
    /// same source id.
    pub fn insert(&self, result: SessionResult) -> Arc<SessionResult> {
        let result = Arc::new(result);
        self.inner
            .lock()
            .expect("result store lock poisoned")
            .insert(result.source_id.clone(), Arc::clone(&result));
        result
    }

    pub fn get(&self, source_id: &str) -> Option<Arc<SessionResult>> {
        self.inner
            .lock()
            .expect("result store lock poisoned")
            .get(source_id)
            .cloned()
    }

    pub fn remove(&self, source_id: &str) -> Option<Arc<SessionResult>> {
        self.inner
            .lock()
            .expect("result store lock poisoned")
            .remove(source_id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("result store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(source_id: &str) -> SessionResult {
        SessionResult {
            source_id: source_id.to_string(),
            observations: Vec::new(),
            total_frame_count: 50,
            source_duration_seconds: 5.0,
            achieved_sample_rate: 10.0,
        }
    }

    #[test]
    fn test_insert_then_get() {
        let store = ResultStore::new();
        store.insert(result("abc"));
        assert_eq!(store.get("abc").unwrap().total_frame_count, 50);
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_insert_replaces_previous_run() {
        let store = ResultStore::new();
        store.insert(result("abc"));
        let mut second = result("abc");
        second.total_frame_count = 99;
        store.insert(second);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("abc").unwrap().total_frame_count, 99);
    }

    #[test]
    fn test_remove() {
        let store = ResultStore::new();
        store.insert(result("abc"));
        assert!(store.remove("abc").is_some());
        assert!(store.is_empty());
    }
}
