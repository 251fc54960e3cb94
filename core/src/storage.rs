use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use core::cell::RefCell;

use crate::StorageError;

/// Narrow string key-value interface over the persisted store (browser `localStorage` or similar).
///
/// Writers are not locked against each other; the last write wins.
pub trait ScoreStorage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store. Clones share the same map, the way tabs of one origin share `localStorage`.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn remove_item(&self, key: &str) -> Option<String> {
        self.items.borrow_mut().remove(key)
    }
}

impl ScoreStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_items() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.clone();

        tab_a.set_item("k", "v").unwrap();

        assert_eq!(tab_b.get_item("k").as_deref(), Some("v"));
        assert_eq!(tab_b.len(), 1);
        assert_eq!(tab_b.remove_item("k").as_deref(), Some("v"));
        assert!(tab_a.is_empty());
    }
}
