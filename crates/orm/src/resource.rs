//! Bootstrap resource that builds the entity manager from an options bundle
//! and publishes it into the application container.

use crate::configuration::Configuration;
use crate::connection::ConnectionParams;
use crate::entity_manager::EntityManager;
use crate::error::{OrmError, OrmResult};
use crate::mapping::{MappingDriver, PhpDriver, XmlDriver, YamlDriver};
use crate::options::OrmOptions;
use ormstrap_cache::{ApcCache, ArrayCache, CacheBackend, CacheKind, MemcacheCache, XcacheCache};
use ormstrap_core::{load_section, Bootstrap, Resource};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Container attribute the entity manager is published under
pub const ENTITY_MANAGER_ATTRIBUTE: &str = "em";

/// Registry key used when the application has no parameter sink
pub const REGISTRY_KEY: &str = "doctrine.config";

pub const MAPPING_PATHS_PARAMETER: &str = "doctrine.orm.mapping_paths";
pub const ENTITIES_PATHS_PARAMETER: &str = "doctrine.orm.entities_paths";

/// Proxy directory below the application path, appended after a `/`
pub const DEFAULT_PROXY_DIR: &str = "data/doctrine2/Proxies";
pub const DEFAULT_PROXY_NAMESPACE: &str = "Proxies";

/// Mapping driver selected by `metadata.driver`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataDriverKind {
    Yaml,
    Xml,
    Php,
    /// Default for any other value, including none
    Annotation,
}

impl MetadataDriverKind {
    pub fn from_option(value: Option<&str>) -> Self {
        match value {
            Some("yaml") => MetadataDriverKind::Yaml,
            Some("xml") => MetadataDriverKind::Xml,
            Some("php") => MetadataDriverKind::Php,
            Some(other) => {
                warn!("Unknown metadata driver '{}', falling back to annotations", other);
                MetadataDriverKind::Annotation
            }
            None => MetadataDriverKind::Annotation,
        }
    }
}

/// Cache adapter selected by `cache`; unknown values and none select the array cache
pub fn cache_kind_from_option(value: Option<&str>) -> CacheKind {
    match value {
        Some("apc") => CacheKind::Apc,
        Some("memcache") => CacheKind::Memcache,
        Some("xcache") => CacheKind::Xcache,
        Some(other) => {
            warn!("Unknown cache '{}', falling back to the array cache", other);
            CacheKind::Array
        }
        None => CacheKind::Array,
    }
}

/// ORM bootstrap resource
#[derive(Debug, Clone)]
pub struct OrmResource {
    options: OrmOptions,
}

impl OrmResource {
    pub const NAME: &'static str = "doctrine2";

    pub fn new(options: OrmOptions) -> Self {
        Self { options }
    }

    /// Read the options from the `section` of an application config file
    pub fn from_file(path: impl AsRef<Path>, section: &str) -> OrmResult<Self> {
        Ok(Self::new(load_section(path, section)?))
    }

    pub fn options(&self) -> &OrmOptions {
        &self.options
    }

    fn mapping_paths(&self) -> Vec<PathBuf> {
        self.options.metadata.mapping_paths.to_vec().into_iter().map(PathBuf::from).collect()
    }

    fn init_metadata_driver(&self, config: &mut Configuration) {
        let kind = MetadataDriverKind::from_option(self.options.metadata.driver.as_deref());
        let paths = self.mapping_paths();

        let driver: Box<dyn MappingDriver> = match kind {
            MetadataDriverKind::Yaml => Box::new(YamlDriver::new(paths)),
            MetadataDriverKind::Xml => Box::new(XmlDriver::new(paths)),
            MetadataDriverKind::Php => Box::new(PhpDriver::new(paths)),
            MetadataDriverKind::Annotation => Box::new(config.new_default_annotation_driver(paths)),
        };

        debug!("Metadata driver: {} over {:?}", driver.format(), driver.paths());
        config.set_metadata_driver_impl(driver);
    }

    fn init_parameters(&self, bootstrap: &Bootstrap) {
        let mapping_paths = Value::from(&self.options.metadata.mapping_paths);
        let entities_paths = Value::from(&self.options.metadata.entities_paths);

        match bootstrap.parameters() {
            Some(parameters) => {
                debug!("Exporting ORM paths as container parameters");
                parameters.set_parameter(MAPPING_PATHS_PARAMETER, mapping_paths);
                parameters.set_parameter(ENTITIES_PATHS_PARAMETER, entities_paths);
            }
            None => {
                debug!("Exporting ORM paths to registry key '{}'", REGISTRY_KEY);
                let mut entry = serde_json::Map::new();
                entry.insert(MAPPING_PATHS_PARAMETER.to_string(), mapping_paths);
                entry.insert(ENTITIES_PATHS_PARAMETER.to_string(), entities_paths);
                bootstrap.registry().set(REGISTRY_KEY, Value::Object(entry));
            }
        }
    }

    fn init_cache(&self, config: &mut Configuration) {
        let cache: Arc<dyn CacheBackend> = match cache_kind_from_option(self.options.cache.as_deref()) {
            CacheKind::Apc => Arc::new(ApcCache::new()),
            CacheKind::Memcache => Arc::new(MemcacheCache::new()),
            CacheKind::Xcache => Arc::new(XcacheCache::new()),
            CacheKind::Array => Arc::new(ArrayCache::new()),
        };

        debug!("Metadata and query cache: {}", cache.kind());
        config.set_metadata_cache_impl(cache.clone());
        config.set_query_cache_impl(cache);
    }

    fn init_proxy(&self, config: &mut Configuration, application_path: &Path) {
        let proxy = &self.options.proxy;
        match &proxy.directory {
            Some(directory) => config.set_proxy_dir(directory),
            None => {
                let mut directory = application_path.as_os_str().to_os_string();
                directory.push("/");
                directory.push(DEFAULT_PROXY_DIR);
                config.set_proxy_dir(directory)
            }
        }
        config.set_proxy_namespace(proxy.namespace.as_deref().unwrap_or(DEFAULT_PROXY_NAMESPACE));
    }

    fn init_connection(&self) -> ConnectionParams {
        self.options.connection.clone()
    }
}

impl Resource for OrmResource {
    type Output = Arc<EntityManager>;
    type Error = OrmError;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn init(&self, bootstrap: &Bootstrap) -> OrmResult<Arc<EntityManager>> {
        let mut config = Configuration::new();

        self.init_metadata_driver(&mut config);
        self.init_parameters(bootstrap);
        self.init_cache(&mut config);
        self.init_proxy(&mut config, bootstrap.application_path());
        let connection = self.init_connection();

        let em = EntityManager::create(connection, config)?;
        bootstrap.container().set(ENTITY_MANAGER_ATTRIBUTE, em.clone());
        info!("Entity manager published as '{}'", ENTITY_MANAGER_ATTRIBUTE);
        Ok(em)
    }

    fn description(&self) -> Option<&'static str> {
        Some("Creates the ORM entity manager and publishes it as 'em'")
    }
}
