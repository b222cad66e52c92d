//! # ormstrap-orm
//!
//! The ORM side of the bootstrap: a [`Configuration`] assembled from mapping
//! drivers, caches and proxy settings, the [`EntityManager`] session created
//! from it, and [`OrmResource`], the bootstrap resource that builds both from
//! an options bundle and publishes the session into the application container.

pub mod error;
pub mod mapping;
pub mod configuration;
pub mod connection;
pub mod entity_manager;
pub mod options;
pub mod resource;

pub use error::*;
pub use mapping::*;
pub use configuration::*;
pub use connection::*;
pub use entity_manager::*;
pub use options::*;
pub use resource::*;
