#[allow(clippy::module_inception)]
pub mod container;
pub mod parameters;
pub mod registry;

pub use container::Container;
pub use parameters::{ParameterBag, ParameterSink};
pub use registry::Registry;
