//! Serializable tenant trees.
//!
//! A snapshot is a nested JSON document:
//!
//! ```json
//! {
//!   "level": "tenant",
//!   "key": "contoso",
//!   "fields": { "RootSiteUrl": "https://contoso.example.com" },
//!   "children": {
//!     "site_collections": [
//!       { "level": "site_collection", "key": "https://contoso.example.com/sites/hr" }
//!     ]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::level::Level;
use crate::traits::store::Axis;
use crate::types::entity::{EntityKey, Fields};

/// One entity of a snapshot and its children, grouped by axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub level: Level,
    pub key: EntityKey,
    #[serde(default, skip_serializing_if = "Fields::is_empty")]
    pub fields: Fields,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<Axis, Vec<SnapshotNode>>,
}

impl SnapshotNode {
    pub fn new(level: Level, key: impl Into<EntityKey>) -> Self {
        Self {
            level,
            key: key.into(),
            fields: Fields::new(),
            children: BTreeMap::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name, value);
        self
    }

    /// Appends a child on `axis`, after any already there.
    pub fn child(mut self, axis: Axis, child: SnapshotNode) -> Self {
        self.children.entry(axis).or_default().push(child);
        self
    }

    pub fn children(mut self, axis: Axis, children: impl IntoIterator<Item = SnapshotNode>) -> Self {
        self.children.entry(axis).or_default().extend(children);
        self
    }

    /// Nodes in this subtree, including this one.
    pub fn count(&self) -> usize {
        1 + self
            .children
            .values()
            .flatten()
            .map(SnapshotNode::count)
            .sum::<usize>()
    }
}
