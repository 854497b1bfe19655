//! Storage adapters
//!
//! | Adapter | Description |
//! |---------|-------------|
//! | [`MemoryStore`] | Single-lock in-memory implementation of every store port |

/// In-memory store implementing all persistence ports
pub mod memory;

pub use memory::MemoryStore;
