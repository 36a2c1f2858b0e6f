//! Typed errors for the tenant runner.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can tell a
//! store failure from a configuration problem.

use std::path::PathBuf;

use thiserror::Error;

use crate::level::Level;
use crate::traits::store::Axis;
use crate::types::entity::EntityKey;

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Hydration or enumeration failed somewhere in the tree
    #[error("store failure: {0}")]
    Store(#[from] StoreError),

    /// The cancellation token fired
    #[error("run cancelled")]
    Cancelled,
}

/// Errors raised by a content store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Loading the fields of an entity failed
    #[error("failed to hydrate {level} '{key}': {source}")]
    Hydrate {
        level: Level,
        key: EntityKey,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Listing the children of an entity failed
    #[error("failed to enumerate {axis} of '{parent}': {source}")]
    Enumerate {
        axis: Axis,
        parent: EntityKey,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The store has no entity with this key
    #[error("entity not found: {key}")]
    NotFound { key: EntityKey },

    /// The store returned a child of the wrong kind for an axis
    #[error("expected {expected} on {axis}, store returned {found} '{key}'")]
    UnexpectedLevel {
        axis: Axis,
        expected: Level,
        found: Level,
        key: EntityKey,
    },

    /// A site collection reported an address that is not a URL
    #[error("invalid site collection URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors detected before traversal begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Root address of the session is malformed
    #[error("invalid root URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A required setting was not provided
    #[error("missing setting: {0}")]
    Missing(&'static str),

    /// Snapshot JSON could not be parsed
    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Two snapshot nodes share a key
    #[error("duplicate entity key in snapshot: {0}")]
    DuplicateKey(EntityKey),

    /// Snapshot root is not a tenant
    #[error("snapshot root must be a tenant, found {0}")]
    SnapshotRoot(Level),

    /// Reading a file failed
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for runs.
pub type Result<T> = std::result::Result<T, RunnerError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias for configuration.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
