//! In-memory content store for tests, demos and offline runs.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::{PoisonError, RwLock};
use url::Url;

use super::snapshot::SnapshotNode;
use crate::error::{ConfigError, ConfigResult, StoreError, StoreResult};
use crate::level::Level;
use crate::session::Session;
use crate::traits::store::{Axis, ContentStore};
use crate::types::entity::{EntityKey, EntityRecord, Fields};
use crate::types::sites::{FileSystemObjectType, Tenant};

/// A store call, as recorded by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Hydrate {
        level: Level,
        key: EntityKey,
        root: Url,
    },
    Children {
        axis: Axis,
        parent: EntityKey,
        root: Url,
    },
}

struct Entry {
    level: Level,
    fields: Fields,
    children: BTreeMap<Axis, Vec<EntityKey>>,
}

/// Serves a tenant tree held in memory.
///
/// Records every call it receives, and can be told to fail on chosen keys
/// or on single enumerations.
pub struct MemoryStore {
    root: EntityKey,
    entries: HashMap<EntityKey, Entry>,
    calls: RwLock<Vec<StoreCall>>,
    failing: RwLock<HashSet<EntityKey>>,
    failing_children: RwLock<HashSet<(EntityKey, Axis)>>,
}

impl MemoryStore {
    /// Build a store from a snapshot rooted at a tenant. Keys must be unique.
    pub fn from_snapshot(root: SnapshotNode) -> ConfigResult<Self> {
        if root.level != Level::Tenant {
            return Err(ConfigError::SnapshotRoot(root.level));
        }

        let root_key = root.key.clone();
        let mut entries = HashMap::with_capacity(root.count());
        insert(&mut entries, root)?;

        Ok(Self {
            root: root_key,
            entries,
            calls: RwLock::new(Vec::new()),
            failing: RwLock::new(HashSet::new()),
            failing_children: RwLock::new(HashSet::new()),
        })
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Self::from_snapshot(serde_json::from_str(json)?)
    }

    /// Read a snapshot file.
    pub async fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json(&json)
    }

    /// The tenant at the root of the snapshot, not yet hydrated.
    pub fn tenant(&self) -> Tenant {
        Tenant::new(self.root.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every call that touches `key` from now on fails.
    pub fn fail_on(&self, key: impl Into<EntityKey>) {
        self.failing
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into());
    }

    /// Only enumerating `axis` under `key` fails. Hydrating `key` still works.
    pub fn fail_children_on(&self, key: impl Into<EntityKey>, axis: Axis) {
        self.failing_children
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((key.into(), axis));
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of enumerations issued on `axis`.
    pub fn children_calls(&self, axis: Axis) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, StoreCall::Children { axis: a, .. } if *a == axis))
            .count()
    }

    /// Number of hydrations issued at `level`.
    pub fn hydrate_calls(&self, level: Level) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, StoreCall::Hydrate { level: l, .. } if *l == level))
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn record(&self, call: StoreCall) {
        self.calls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn is_failing(&self, key: &EntityKey) -> bool {
        self.failing
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }

    fn is_failing_children(&self, key: &EntityKey, axis: Axis) -> bool {
        self.failing_children
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&(key.clone(), axis))
    }

    fn entry(&self, key: &EntityKey) -> StoreResult<&Entry> {
        self.entries
            .get(key)
            .ok_or_else(|| StoreError::NotFound { key: key.clone() })
    }
}

fn insert(entries: &mut HashMap<EntityKey, Entry>, node: SnapshotNode) -> ConfigResult<()> {
    if entries.contains_key(&node.key) {
        return Err(ConfigError::DuplicateKey(node.key));
    }

    let mut children = BTreeMap::new();
    let mut nested = Vec::new();
    for (axis, nodes) in node.children {
        children.insert(axis, nodes.iter().map(|n| n.key.clone()).collect());
        nested.extend(nodes);
    }

    entries.insert(
        node.key,
        Entry {
            level: node.level,
            fields: node.fields,
            children,
        },
    );

    for child in nested {
        insert(entries, child)?;
    }
    Ok(())
}

/// File hydration is addressed with the key of the list item carrying the
/// file.
fn serves(entry: &Entry, level: Level) -> bool {
    entry.level == level
        || (level == Level::File
            && entry.level == Level::ListItem
            && FileSystemObjectType::of(&entry.fields) == FileSystemObjectType::File)
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn hydrate(
        &self,
        session: &Session,
        level: Level,
        key: &EntityKey,
        fields: &[&str],
    ) -> StoreResult<Fields> {
        self.record(StoreCall::Hydrate {
            level,
            key: key.clone(),
            root: session.root().clone(),
        });

        if self.is_failing(key) {
            return Err(StoreError::Hydrate {
                level,
                key: key.clone(),
                source: "injected failure".into(),
            });
        }

        let entry = self.entry(key)?;
        if !serves(entry, level) {
            return Err(StoreError::Hydrate {
                level,
                key: key.clone(),
                source: format!("entity is a {}", entry.level).into(),
            });
        }
        Ok(entry.fields.select(fields))
    }

    async fn children(
        &self,
        session: &Session,
        parent: &EntityKey,
        axis: Axis,
    ) -> StoreResult<Vec<EntityRecord>> {
        self.record(StoreCall::Children {
            axis,
            parent: parent.clone(),
            root: session.root().clone(),
        });

        if self.is_failing(parent) || self.is_failing_children(parent, axis) {
            return Err(StoreError::Enumerate {
                axis,
                parent: parent.clone(),
                source: "injected failure".into(),
            });
        }

        let entry = self.entry(parent)?;
        let Some(keys) = entry.children.get(&axis) else {
            return Ok(Vec::new());
        };

        keys.iter()
            .map(|key| {
                let child = self.entry(key)?;
                Ok(EntityRecord::new(child.level, key.clone()).with_fields(child.fields.clone()))
            })
            .collect()
    }
}
