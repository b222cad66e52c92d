//! The ORM session handed to the rest of the application.

use crate::configuration::Configuration;
use crate::connection::{Connection, ConnectionParams};
use crate::error::{OrmError, OrmResult};
use crate::mapping::MappingDriver;
use sqlx::AnyPool;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Entity manager created from connection parameters and a complete
/// [`Configuration`]
#[derive(Debug)]
pub struct EntityManager {
    configuration: Configuration,
    connection: Connection,
    closed: AtomicBool,
}

impl EntityManager {
    /// Create an entity manager.
    ///
    /// The configuration must carry a mapping driver, a proxy directory and
    /// a proxy namespace; the connection parameters must name a driver.
    pub fn create(params: ConnectionParams, configuration: Configuration) -> OrmResult<Arc<Self>> {
        if configuration.metadata_driver_impl().is_none() {
            return Err(OrmError::configuration(
                "It's a requirement to specify a Metadata Driver and pass it to Configuration::set_metadata_driver_impl()",
            ));
        }
        if configuration.proxy_dir().is_none() {
            return Err(OrmError::configuration("You must configure a proxy directory"));
        }
        if configuration.proxy_namespace().is_none() {
            return Err(OrmError::configuration("You must configure a proxy namespace"));
        }

        let connection = Connection::new(params)?;
        tracing::debug!("Creating entity manager: {:?}", configuration);

        Ok(Arc::new(Self {
            configuration,
            connection,
            closed: AtomicBool::new(false),
        }))
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn metadata_driver(&self) -> Option<&dyn MappingDriver> {
        self.configuration.metadata_driver_impl()
    }

    /// Every class the mapping driver knows about
    pub fn entity_class_names(&self) -> OrmResult<Vec<String>> {
        self.ensure_open()?;
        self.metadata_driver()
            .ok_or_else(|| OrmError::configuration("No metadata driver configured"))?
            .all_class_names()
    }

    /// Open the underlying database connection
    pub async fn connect(&self) -> OrmResult<AnyPool> {
        self.ensure_open()?;
        self.connection.connect().await
    }

    pub fn is_open(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    fn ensure_open(&self) -> OrmResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(OrmError::Closed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::YamlDriver;
    use serde_json::json;
    use std::path::PathBuf;

    fn sqlite_params() -> ConnectionParams {
        serde_json::from_value(json!({"driver": "pdo_sqlite", "memory": true})).unwrap()
    }

    fn complete_configuration() -> Configuration {
        let mut config = Configuration::new();
        config.set_metadata_driver_impl(Box::new(YamlDriver::new(vec![PathBuf::from("/mappings")])));
        config.set_proxy_dir("/tmp/proxies");
        config.set_proxy_namespace("Proxies");
        config
    }

    #[test]
    fn test_create_requires_metadata_driver() {
        let mut config = Configuration::new();
        config.set_proxy_dir("/tmp/proxies");
        config.set_proxy_namespace("Proxies");

        let err = EntityManager::create(sqlite_params(), config).unwrap_err();
        assert!(matches!(err, OrmError::Configuration(msg) if msg.contains("Metadata Driver")));
    }

    #[test]
    fn test_create_requires_proxy_settings() {
        let mut config = Configuration::new();
        config.set_metadata_driver_impl(Box::new(YamlDriver::new(Vec::new())));
        assert!(EntityManager::create(sqlite_params(), config).is_err());
    }

    #[test]
    fn test_create_rejects_bad_connection() {
        let err = EntityManager::create(ConnectionParams::new(), complete_configuration()).unwrap_err();
        assert!(matches!(err, OrmError::Connection(_)));
    }

    #[test]
    fn test_create_and_close() {
        let em = EntityManager::create(sqlite_params(), complete_configuration()).unwrap();
        assert!(em.is_open());
        assert_eq!(em.connection().params(), &sqlite_params());
        assert_eq!(em.configuration().proxy_namespace(), Some("Proxies"));

        em.close();
        assert!(!em.is_open());
        assert!(matches!(em.entity_class_names(), Err(OrmError::Closed)));
    }

    #[tokio::test]
    async fn test_connect() {
        let em = EntityManager::create(sqlite_params(), complete_configuration()).unwrap();
        let pool = em.connect().await.unwrap();
        pool.close().await;
    }
}
