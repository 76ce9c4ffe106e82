use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};

use uuid::Uuid;

use crate::runner::ds::class::ClassId;
use crate::runner::ds::value::Value;

/// Per-instance attribute storage, keyed by (possibly mangled) attribute key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceStore {
    values: HashMap<String, Value>,
}

impl InstanceStore {
    pub fn new() -> Self {
        InstanceStore {
            values: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Store `value` under `key`, returning the value it replaced.
    pub fn insert<K: Into<String>>(&mut self, key: K, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.values.keys().map(|k| k.as_str()).collect();
        keys.sort();
        keys
    }
}

/// An object of a registered class. Owns its store; shares its class by id.
#[derive(Debug)]
pub struct Instance {
    id: Uuid,
    class_id: ClassId,
    store: InstanceStore,
}

impl Instance {
    pub(crate) fn new(class_id: ClassId) -> Self {
        Instance {
            id: Uuid::new_v4(),
            class_id,
            store: InstanceStore::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    pub fn store(&self) -> &InstanceStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut InstanceStore {
        &mut self.store
    }
}

impl Display for Instance {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<instance {}>", self.id.to_hyphenated())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_insert_and_remove() {
        let mut store = InstanceStore::new();
        assert!(store.is_empty());
        assert_eq!(store.insert("b", Value::Integer(1)), None);
        assert_eq!(store.insert("a", Value::Integer(2)), None);
        assert_eq!(store.insert("b", Value::Integer(3)), Some(Value::Integer(1)));
        assert_eq!(store.keys(), vec!["a", "b"]);
        assert_eq!(store.remove("a"), Some(Value::Integer(2)));
        assert!(!store.contains("a"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_instances_have_distinct_ids() {
        let a = Instance::new(ClassId(0));
        let b = Instance::new(ClassId(0));
        assert_ne!(a.id(), b.id());
        assert!(a.store().is_empty());
    }
}
