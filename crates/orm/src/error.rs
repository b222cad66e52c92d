//! Error types for the ORM layer

use ormstrap_cache::CacheError;
use ormstrap_core::{ConfigError, CoreError};
use thiserror::Error;

/// Result type alias for ORM operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types raised by the ORM collaborators
#[derive(Debug, Error)]
pub enum OrmError {
    /// Mapping driver could not read its sources
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Connection parameters are unusable
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration object is incomplete
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Entity manager was closed
    #[error("The EntityManager is closed")]
    Closed,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Options error: {0}")]
    Options(#[from] ConfigError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl OrmError {
    pub fn mapping(message: impl Into<String>) -> Self {
        Self::Mapping(message.into())
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}
