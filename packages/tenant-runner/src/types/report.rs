//! Summary of a finished run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::level::Level;

/// What a run did: how many nodes it processed per level, how many store
/// calls it issued and how many axes it pruned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub receivers: usize,
    pub nodes: BTreeMap<Level, usize>,
    pub store_calls: usize,
    pub pruned_axes: usize,
}

impl RunReport {
    pub(crate) fn start(receivers: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            receivers,
            nodes: BTreeMap::new(),
            store_calls: 0,
            pruned_axes: 0,
        }
    }

    pub(crate) fn node(&mut self, level: Level) {
        *self.nodes.entry(level).or_insert(0) += 1;
    }

    pub(crate) fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Nodes processed at `level`.
    pub fn nodes_at(&self, level: Level) -> usize {
        self.nodes.get(&level).copied().unwrap_or(0)
    }

    pub fn total_nodes(&self) -> usize {
        self.nodes.values().sum()
    }
}
