use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;

/// Key/value registry owned by the bootstrap.
///
/// Holds settings exported by resources when the application has no
/// [`ParameterSink`](crate::container::ParameterSink) to receive them.
#[derive(Debug, Default)]
pub struct Registry {
    entries: RwLock<HashMap<String, Value>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entry, replacing any previous value
    pub fn set(&self, key: impl Into<String>, value: Value) {
        let key = key.into();
        tracing::debug!("Registry entry '{}' set", key);
        self.entries.write().insert(key, value);
    }

    /// Fetch a copy of an entry
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registry_set_get() {
        let registry = Registry::new();
        assert!(registry.is_empty());

        registry.set("doctrine.config", json!({"a": 1}));
        registry.set("doctrine.config", json!({"a": 2}));

        assert_eq!(registry.get("doctrine.config"), Some(json!({"a": 2})));
        assert!(registry.contains("doctrine.config"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("missing"), None);
    }
}
