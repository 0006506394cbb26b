//! Stub implementations for testing.
//!
//! - [`InMemoryTribeStore`]: implements every core trait over `DashMap`s

mod in_memory_store;

pub use in_memory_store::InMemoryTribeStore;
