//! ORM configuration object, filled in step by step before the entity
//! manager is created.

use crate::mapping::{AnnotationDriver, MappingDriver};
use ormstrap_cache::CacheBackend;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Settings the entity manager is created from
pub struct Configuration {
    metadata_driver: Option<Box<dyn MappingDriver>>,
    metadata_cache: Option<Arc<dyn CacheBackend>>,
    query_cache: Option<Arc<dyn CacheBackend>>,
    proxy_dir: Option<PathBuf>,
    proxy_namespace: Option<String>,
    auto_generate_proxy_classes: bool,
}

impl Configuration {
    pub fn new() -> Self {
        Self {
            metadata_driver: None,
            metadata_cache: None,
            query_cache: None,
            proxy_dir: None,
            proxy_namespace: None,
            auto_generate_proxy_classes: true,
        }
    }

    /// The annotation driver used when no other format is configured
    pub fn new_default_annotation_driver(&self, paths: Vec<PathBuf>) -> AnnotationDriver {
        AnnotationDriver::new(paths)
    }

    pub fn set_metadata_driver_impl(&mut self, driver: Box<dyn MappingDriver>) {
        self.metadata_driver = Some(driver);
    }

    pub fn metadata_driver_impl(&self) -> Option<&dyn MappingDriver> {
        self.metadata_driver.as_deref()
    }

    pub fn set_metadata_cache_impl(&mut self, cache: Arc<dyn CacheBackend>) {
        self.metadata_cache = Some(cache);
    }

    pub fn metadata_cache_impl(&self) -> Option<&Arc<dyn CacheBackend>> {
        self.metadata_cache.as_ref()
    }

    pub fn set_query_cache_impl(&mut self, cache: Arc<dyn CacheBackend>) {
        self.query_cache = Some(cache);
    }

    pub fn query_cache_impl(&self) -> Option<&Arc<dyn CacheBackend>> {
        self.query_cache.as_ref()
    }

    /// Directory generated proxy classes are written to
    pub fn set_proxy_dir(&mut self, dir: impl Into<PathBuf>) {
        self.proxy_dir = Some(dir.into());
    }

    pub fn proxy_dir(&self) -> Option<&Path> {
        self.proxy_dir.as_deref()
    }

    /// Namespace generated proxy classes live in
    pub fn set_proxy_namespace(&mut self, namespace: impl Into<String>) {
        self.proxy_namespace = Some(namespace.into());
    }

    pub fn proxy_namespace(&self) -> Option<&str> {
        self.proxy_namespace.as_deref()
    }

    pub fn set_auto_generate_proxy_classes(&mut self, enabled: bool) {
        self.auto_generate_proxy_classes = enabled;
    }

    pub fn auto_generate_proxy_classes(&self) -> bool {
        self.auto_generate_proxy_classes
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("metadata_driver", &self.metadata_driver.as_ref().map(|d| d.format()))
            .field("metadata_cache", &self.metadata_cache.as_ref().map(|c| c.kind()))
            .field("query_cache", &self.query_cache.as_ref().map(|c| c.kind()))
            .field("proxy_dir", &self.proxy_dir)
            .field("proxy_namespace", &self.proxy_namespace)
            .field("auto_generate_proxy_classes", &self.auto_generate_proxy_classes)
            .finish()
    }
}
