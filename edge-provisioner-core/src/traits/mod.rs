//! Platform abstraction traits.

mod state_store;

pub use state_store::{InMemoryStackStateStore, StackStateStore};
