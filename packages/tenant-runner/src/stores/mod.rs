//! Content store implementations.
//!
//! Available backends:
//! - `MemoryStore` - serves a [`SnapshotNode`] tree from memory

pub mod memory;
pub mod snapshot;

pub use memory::{MemoryStore, StoreCall};
pub use snapshot::SnapshotNode;
