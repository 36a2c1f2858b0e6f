//! Ready-made receivers.

pub mod inventory;
pub mod trace;

pub use inventory::{Inventory, InventoryHandle, InventoryReceiver};
pub use trace::TraceReceiver;
