//! Receiver-driven tenant crawler
//!
//! Walks the content tree of a tenant (the managed-metadata taxonomy and
//! every site collection beneath it) and hands each entity to the receivers
//! that asked for its level.
//!
//! # Design
//!
//! - Receivers opt into levels by capability, not by inheritance
//! - Whole subtrees are skipped when no receiver wants anything in them
//! - One traversal protocol for every level
//! - The content store is a trait; transport is the application's concern
//!
//! # Usage
//!
//! ```rust,ignore
//! use tenant_runner::{Credentials, MemoryStore, RunningManager, Session};
//! use tenant_runner::receivers::InventoryReceiver;
//!
//! let store = MemoryStore::load("tenant.json").await?;
//! let tenant = store.tenant();
//! let session = Session::new("https://contoso-admin.example.com", Credentials::anonymous())?;
//!
//! let inventory = InventoryReceiver::new();
//! let totals = inventory.handle();
//!
//! let mut manager = RunningManager::new(store, session);
//! manager.register(inventory);
//! let report = manager.run(tenant).await?;
//!
//! println!("{} files in {} nodes", totals.snapshot().files, report.total_nodes());
//! ```
//!
//! # Modules
//!
//! - [`level`] - Crawl levels and level sets
//! - [`traits`] - Core trait abstractions (ContentStore, Receiver)
//! - [`types`] - Entities, receiver options and run reports
//! - [`registry`] - Registered receivers and pruning queries
//! - [`manager`] - The run entry point
//! - [`stores`] - Store implementations (MemoryStore)
//! - [`receivers`] - Ready-made receivers (inventory, trace)
//! - [`testing`] - Recording receiver and a sample tenant

pub mod error;
pub mod level;
pub mod manager;
pub mod receivers;
pub mod registry;
mod runner;
pub mod session;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{ConfigError, ConfigResult, Result, RunnerError, StoreError, StoreResult};
pub use level::{Level, LevelSet};
pub use manager::RunningManager;
pub use registry::{Registration, Registry};
pub use session::{Credentials, Secret, Session};
pub use traits::{
    receiver::{
        FileReceiver, FolderReceiver, ListItemReceiver, ListReceiver, Receiver,
        SiteCollectionReceiver, SiteReceiver, TenantReceiver, TermGroupReceiver, TermReceiver,
        TermSetReceiver, TermStoreReceiver, ViewReceiver,
    },
    store::{Axis, ContentStore},
};
pub use types::{
    config::ReceiverOptions,
    entity::{Element, EntityKey, EntityRecord, Fields},
    report::RunReport,
};

// Re-export stores
pub use stores::{MemoryStore, SnapshotNode, StoreCall};

// Re-export the cancellation token type callers hand to the manager
pub use tokio_util::sync::CancellationToken;
