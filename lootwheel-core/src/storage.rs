//! In-memory key/value storage used by tests, the tester CLI, and any host
//! without a persistent backend.
use crate::ConfigStorage;
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

/// Shared in-memory record map. Clones observe the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    records: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record before the store loads.
    #[must_use]
    pub fn with_record(self, key: &str, value: &str) -> Self {
        self.records
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Raw contents of a record, if present.
    #[must_use]
    pub fn record(&self, key: &str) -> Option<String> {
        self.records.borrow().get(key).cloned()
    }
}

impl ConfigStorage for MemoryStorage {
    type Error = Infallible;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.record(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.records
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_records() {
        let storage = MemoryStorage::new().with_record("a", "1");
        let view = storage.clone();
        storage.write("b", "2").unwrap();
        assert_eq!(view.read("a").unwrap().as_deref(), Some("1"));
        assert_eq!(view.record("b").as_deref(), Some("2"));
        assert!(storage.record("c").is_none());
    }
}
