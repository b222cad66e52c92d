use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;

/// Capability of a dependency-injection container to hold named parameters.
///
/// Applications that run a DI container hand an implementation to the
/// bootstrap; resources then export their settings through it instead of
/// the bootstrap registry.
pub trait ParameterSink: Send + Sync {
    /// Set (or replace) a parameter
    fn set_parameter(&self, name: &str, value: Value);

    /// Read a parameter back
    fn parameter(&self, name: &str) -> Option<Value>;
}

/// In-process parameter store
#[derive(Debug, Default)]
pub struct ParameterBag {
    parameters: RwLock<HashMap<String, Value>>,
}

impl ParameterBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a parameter is set
    pub fn has(&self, name: &str) -> bool {
        self.parameters.read().contains_key(name)
    }

    /// All parameter names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.parameters.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl ParameterSink for ParameterBag {
    fn set_parameter(&self, name: &str, value: Value) {
        self.parameters.write().insert(name.to_string(), value);
    }

    fn parameter(&self, name: &str) -> Option<Value> {
        self.parameters.read().get(name).cloned()
    }
}
