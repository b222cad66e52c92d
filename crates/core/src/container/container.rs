use crate::errors::CoreError;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

type Attribute = Arc<dyn Any + Send + Sync>;

/// Shared application container.
///
/// Resources publish what they build under a name (`em` for the entity
/// manager) and the rest of the application picks it up from here.
#[derive(Default)]
pub struct Container {
    attributes: RwLock<HashMap<String, Attribute>>,
}

impl Container {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish an attribute, replacing any previous value under that name.
    /// Returns `true` when an earlier value was overwritten.
    pub fn set<T>(&self, name: impl Into<String>, value: Arc<T>) -> bool
    where
        T: Send + Sync + 'static,
    {
        let name = name.into();
        let replaced = self.attributes.write().insert(name.clone(), value).is_some();
        if replaced {
            tracing::debug!("Container attribute '{}' overwritten", name);
        }
        replaced
    }

    /// Resolve an attribute by name and type
    pub fn get<T>(&self, name: &str) -> Result<Arc<T>, CoreError>
    where
        T: Send + Sync + 'static,
    {
        let attribute = self
            .attributes
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::service_not_found(name))?;

        attribute
            .downcast::<T>()
            .map_err(|_| CoreError::TypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Resolve an attribute, returning None if it is missing or of another type
    pub fn try_get<T>(&self, name: &str) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.get(name).ok()
    }

    /// Check if an attribute is published
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.read().contains_key(name)
    }

    /// Names of all published attributes, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.attributes.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.attributes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.read().is_empty()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("attributes", &self.names())
            .finish()
    }
}
