//! # ormstrap-core
//!
//! Shared plumbing for bootstrap resources: the options loader, the named
//! application container, the parameter sink / registry pair used to export
//! settings, and the [`Resource`] protocol run by [`Bootstrap`].

pub mod errors;
pub mod config;
pub mod container;
pub mod bootstrap;

pub use errors::CoreError;
pub use config::{load_options, load_section, parse_options, ConfigError, OptionsFormat};
pub use container::{Container, ParameterBag, ParameterSink, Registry};
pub use bootstrap::{Bootstrap, Resource};

