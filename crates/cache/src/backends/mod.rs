//! Cache backend implementations

pub mod memory;
pub mod shared;
pub mod memcache;

pub use memory::*;
pub use shared::*;
pub use self::memcache::*;
