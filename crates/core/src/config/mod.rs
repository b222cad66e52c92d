pub mod sources;
pub mod validation;

pub use sources::*;
pub use validation::*;
