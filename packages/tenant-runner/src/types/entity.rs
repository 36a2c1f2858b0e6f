//! Entity identity and property bags.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{StoreError, StoreResult};
use crate::level::Level;
use crate::traits::store::Axis;

/// Identity of an entity in the content store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKey(String);

impl EntityKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for EntityKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Named properties of an entity, as populated by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<String, Value>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn u64(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(Value::as_u64)
    }

    /// Copies every field of `other` over this bag.
    pub fn merge(&mut self, other: Fields) {
        self.0.extend(other.0);
    }

    /// Only the named fields that are present.
    pub fn select(&self, names: &[&str]) -> Fields {
        Fields(
            names
                .iter()
                .filter_map(|name| self.0.get(*name).map(|v| (name.to_string(), v.clone())))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// An entity as returned by a child enumeration: its level, its key, and
/// whatever summary fields the store returned with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub level: Level,
    pub key: EntityKey,
    #[serde(default)]
    pub fields: Fields,
}

impl EntityRecord {
    pub fn new(level: Level, key: impl Into<EntityKey>) -> Self {
        Self {
            level,
            key: key.into(),
            fields: Fields::new(),
        }
    }

    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }
}

/// A typed entity at one level of the tree.
pub trait Element: Send + Sync + Sized {
    /// Level this entity lives at.
    const LEVEL: Level;

    /// Field selectors requested when hydrating.
    const FIELDS: &'static [&'static str];

    fn from_parts(key: EntityKey, fields: Fields) -> Self;

    fn key(&self) -> &EntityKey;

    fn fields(&self) -> &Fields;

    fn fields_mut(&mut self) -> &mut Fields;

    /// Converts an enumerated record, checking that it is of this level.
    fn from_record(axis: Axis, record: EntityRecord) -> StoreResult<Self> {
        if record.level != Self::LEVEL {
            return Err(StoreError::UnexpectedLevel {
                axis,
                expected: Self::LEVEL,
                found: record.level,
                key: record.key,
            });
        }
        Ok(Self::from_parts(record.key, record.fields))
    }
}

/// Declares an entity type: a key plus a field bag, with its level and the
/// fields hydration requests.
macro_rules! element {
    ($(#[$meta:meta])* $name:ident, $level:expr, [$($field:literal),* $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        pub struct $name {
            key: $crate::types::entity::EntityKey,
            #[serde(default)]
            fields: $crate::types::entity::Fields,
        }

        impl $name {
            pub fn new(key: impl Into<$crate::types::entity::EntityKey>) -> Self {
                Self {
                    key: key.into(),
                    fields: $crate::types::entity::Fields::new(),
                }
            }
        }

        impl $crate::types::entity::Element for $name {
            const LEVEL: $crate::level::Level = $level;
            const FIELDS: &'static [&'static str] = &[$($field),*];

            fn from_parts(
                key: $crate::types::entity::EntityKey,
                fields: $crate::types::entity::Fields,
            ) -> Self {
                Self { key, fields }
            }

            fn key(&self) -> &$crate::types::entity::EntityKey {
                &self.key
            }

            fn fields(&self) -> &$crate::types::entity::Fields {
                &self.fields
            }

            fn fields_mut(&mut self) -> &mut $crate::types::entity::Fields {
                &mut self.fields
            }
        }
    };
}

pub(crate) use element;
