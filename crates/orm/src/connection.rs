//! Database connection described by opaque, driver-specific parameters.
//!
//! The parameters arrive untouched from the options bundle. They are only
//! checked when the entity manager is created, and a database is only
//! contacted when [`Connection::connect`] is awaited.

use crate::error::{OrmError, OrmResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use url::Url;

/// Connection parameters, passed through verbatim
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionParams(Map<String, Value>);

impl ConnectionParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// A parameter as a string; numbers are rendered as text
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for ConnectionParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Database drivers a connection can name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    PdoSqlite,
    PdoMysql,
    PdoPgsql,
    PdoOci,
    Oci8,
}

impl Driver {
    pub const NAMES: [&'static str; 5] = ["pdo_sqlite", "pdo_mysql", "pdo_pgsql", "pdo_oci", "oci8"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pdo_sqlite" => Some(Driver::PdoSqlite),
            "pdo_mysql" => Some(Driver::PdoMysql),
            "pdo_pgsql" => Some(Driver::PdoPgsql),
            "pdo_oci" => Some(Driver::PdoOci),
            "oci8" => Some(Driver::Oci8),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Driver::PdoSqlite => "pdo_sqlite",
            Driver::PdoMysql => "pdo_mysql",
            Driver::PdoPgsql => "pdo_pgsql",
            Driver::PdoOci => "pdo_oci",
            Driver::Oci8 => "oci8",
        }
    }
}

/// Lazily opened database connection
#[derive(Debug, Clone)]
pub struct Connection {
    params: ConnectionParams,
    driver: Option<Driver>,
}

impl Connection {
    /// Validate the parameters; nothing is opened yet
    pub fn new(params: ConnectionParams) -> OrmResult<Self> {
        let driver = match params.get("driver") {
            Some(Value::String(name)) => Some(Driver::from_name(name).ok_or_else(|| {
                OrmError::connection(format!(
                    "The given 'driver' {} is unknown, known drivers are: {}",
                    name,
                    Driver::NAMES.join(", ")
                ))
            })?),
            Some(other) => {
                return Err(OrmError::connection(format!("The 'driver' option must be a string, got {}", other)))
            }
            None if params.get_str("url").is_some() => None,
            None => {
                return Err(OrmError::connection(
                    "The options 'driver' or 'url' are mandatory if no PDO instance is given",
                ))
            }
        };

        Ok(Self { params, driver })
    }

    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    pub fn driver(&self) -> Option<Driver> {
        self.driver
    }

    /// sqlx connection URL equivalent to the parameters
    pub fn database_url(&self) -> OrmResult<String> {
        if let Some(url) = self.params.get_str("url") {
            return Ok(url);
        }

        match self.driver {
            Some(Driver::PdoSqlite) => self.sqlite_url(),
            Some(Driver::PdoPgsql) => self.network_url("postgres"),
            Some(Driver::PdoMysql) => self.network_url("mysql"),
            Some(driver @ (Driver::PdoOci | Driver::Oci8)) => Err(OrmError::connection(format!(
                "Driver '{}' cannot be opened from this runtime",
                driver.name()
            ))),
            None => Err(OrmError::connection("No driver configured")),
        }
    }

    fn sqlite_url(&self) -> OrmResult<String> {
        let in_memory = self.params.get("memory").and_then(Value::as_bool).unwrap_or(false);
        match self.params.get_str("path") {
            _ if in_memory => Ok("sqlite::memory:".to_string()),
            Some(path) if path == ":memory:" => Ok("sqlite::memory:".to_string()),
            Some(path) => Ok(format!("sqlite:{}", path)),
            None => Err(OrmError::connection("pdo_sqlite needs either 'path' or 'memory'")),
        }
    }

    fn network_url(&self, scheme: &str) -> OrmResult<String> {
        let host = self.params.get_str("host").unwrap_or_else(|| "localhost".to_string());
        let invalid = |what: &str| OrmError::connection(format!("Invalid {} in connection parameters", what));

        let mut url = Url::parse(&format!("{}://{}", scheme, host)).map_err(|_| invalid("host"))?;
        if let Some(user) = self.params.get_str("user") {
            url.set_username(&user).map_err(|_| invalid("user"))?;
        }
        if let Some(password) = self.params.get_str("password") {
            url.set_password(Some(&password)).map_err(|_| invalid("password"))?;
        }
        if let Some(port) = self.params.get_str("port") {
            let port: u16 = port.parse().map_err(|_| invalid("port"))?;
            url.set_port(Some(port)).map_err(|_| invalid("port"))?;
        }
        if let Some(dbname) = self.params.get_str("dbname") {
            url.set_path(&format!("/{}", dbname.trim_start_matches('/')));
        }
        Ok(url.to_string())
    }

    /// Pool size from `max_connections`, 10 when unset
    fn max_connections(&self, url: &str) -> OrmResult<u32> {
        if url.starts_with("sqlite::memory:") {
            // every in-memory connection is its own database
            return Ok(1);
        }
        match self.params.get("max_connections") {
            None | Some(Value::Null) => Ok(10),
            Some(value) => value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    OrmError::connection(format!("Invalid connection parameter 'max_connections': {}", value))
                }),
        }
    }

    /// Open a connection pool for these parameters
    pub async fn connect(&self) -> OrmResult<AnyPool> {
        let url = self.database_url()?;
        let max_connections = self.max_connections(&url)?;

        sqlx::any::install_default_drivers();
        tracing::debug!(
            "Opening {} connection pool (max_connections={})",
            self.driver.map(|d| d.name()).unwrap_or("url"),
            max_connections
        );

        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .connect(&url)
            .await
            .map_err(|e| {
                tracing::error!("Failed to open database connection: {}", e);
                OrmError::Database(e)
            })?;

        tracing::info!("✅ Database connection opened");
        Ok(pool)
    }
}
