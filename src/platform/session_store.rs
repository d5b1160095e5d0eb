//! Session-scoped storage for scroll records
//!
//! Values live only for the browsing session. `MemorySessionStore` can be
//! given a byte quota to exercise hosts that refuse writes.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::{Error, Result};

/// Session-scoped string key/value storage (the shape of `sessionStorage`)
pub trait SessionStore {
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store a value. Hosts may refuse, e.g. when a storage quota is exhausted.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    fn remove_item(&self, key: &str);

    /// Drop every entry (the browsing session ended)
    fn clear(&self);
}

/// In-memory session store with an optional byte quota over keys plus values
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
    quota_bytes: Option<usize>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        MemorySessionStore {
            entries: Rc::default(),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Snapshot of every entry, ordered by key
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.borrow().clone()
    }

    fn used_bytes_without(entries: &BTreeMap<String, String>, key: &str) -> usize {
        entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl SessionStore for MemorySessionStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.borrow_mut();
        if let Some(quota) = self.quota_bytes {
            let needed = Self::used_bytes_without(&entries, key) + key.len() + value.len();
            if needed > quota {
                return Err(Error::StoreError(format!(
                    "quota exceeded writing {}: {} > {} bytes",
                    key, needed, quota
                )));
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }

    fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}
