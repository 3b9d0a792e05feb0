/// Persisted key-value storage — the session store collaborator.
///
/// The portal persists the published run under `verificationResult` and the
/// login session under `userData`; a separate results view reads the former.
/// Writes are last-writer-wins, no merge, no history.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

pub const KEY_VERIFICATION_RESULT: &str = "verificationResult";
pub const KEY_USER_DATA: &str = "userData";

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

/// Process-scoped store. Stands in for the browser session storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}
