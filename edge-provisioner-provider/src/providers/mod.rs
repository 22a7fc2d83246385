//! Concrete control-plane backends.

#[cfg(feature = "memory")]
mod memory;

#[cfg(feature = "memory")]
pub use memory::{CloudEvent, MemoryCloud};
