//! Crawl levels.
//!
//! A [`Level`] names a position in the tenant tree. Levels form two chains
//! hanging off the tenant:
//!
//! ```text
//! Tenant ─┬─ TermStore ─ TermGroup ─ TermSet ─ Term
//!         └─ SiteCollection ─ Site ─ List ─┬─ View
//!                                          └─ Folder ─┬─ ListItem
//!                                                     └─ File
//! ```
//!
//! Ranks only grow along a chain. Ranks of the two chains share one number
//! space, so pruning never compares ranks directly; it asks
//! [`Level::is_at_or_below`], which walks parent links and therefore stays on
//! a single chain.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A position in the crawl hierarchy.
///
/// Declaration order follows rank, so the derived `Ord` is the rank order
/// (ties at rank 8 are broken by declaration order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Tenant,
    TermStore,
    TermGroup,
    TermSet,
    Term,
    SiteCollection,
    Site,
    List,
    View,
    Folder,
    ListItem,
    File,
}

/// The branch of the tree a level belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chain {
    Root,
    Taxonomy,
    Sites,
}

impl Level {
    /// Every level, in rank order.
    pub const ALL: [Level; 12] = [
        Level::Tenant,
        Level::TermStore,
        Level::TermGroup,
        Level::TermSet,
        Level::Term,
        Level::SiteCollection,
        Level::Site,
        Level::List,
        Level::View,
        Level::Folder,
        Level::ListItem,
        Level::File,
    ];

    pub const fn rank(self) -> u8 {
        match self {
            Level::Tenant => 0,
            Level::TermStore => 1,
            Level::TermGroup => 2,
            Level::TermSet => 3,
            Level::Term => 4,
            Level::SiteCollection => 5,
            Level::Site => 6,
            Level::List => 7,
            Level::View | Level::Folder | Level::ListItem | Level::File => 8,
        }
    }

    pub const fn chain(self) -> Chain {
        match self {
            Level::Tenant => Chain::Root,
            Level::TermStore | Level::TermGroup | Level::TermSet | Level::Term => Chain::Taxonomy,
            _ => Chain::Sites,
        }
    }

    /// The level directly above this one. `None` for the tenant.
    pub const fn parent(self) -> Option<Level> {
        match self {
            Level::Tenant => None,
            Level::TermStore | Level::SiteCollection => Some(Level::Tenant),
            Level::TermGroup => Some(Level::TermStore),
            Level::TermSet => Some(Level::TermGroup),
            Level::Term => Some(Level::TermSet),
            Level::Site => Some(Level::SiteCollection),
            Level::List => Some(Level::Site),
            Level::View | Level::Folder => Some(Level::List),
            Level::ListItem | Level::File => Some(Level::Folder),
        }
    }

    /// Rank comparison.
    pub fn less_or_equal(self, other: Level) -> bool {
        self.rank() <= other.rank()
    }

    /// True if `self` is `target` or lies beneath `target` on its chain.
    pub fn is_at_or_below(self, target: Level) -> bool {
        let mut current = Some(self);
        while let Some(level) = current {
            if level == target {
                return true;
            }
            current = level.parent();
        }
        false
    }

    /// Kind identifier used by [`FromStr`] and the serde representation.
    pub const fn kind(self) -> &'static str {
        match self {
            Level::Tenant => "tenant",
            Level::TermStore => "term_store",
            Level::TermGroup => "term_group",
            Level::TermSet => "term_set",
            Level::Term => "term",
            Level::SiteCollection => "site_collection",
            Level::Site => "site",
            Level::List => "list",
            Level::View => "view",
            Level::Folder => "folder",
            Level::ListItem => "list_item",
            Level::File => "file",
        }
    }

    /// Looks a level up by its kind identifier.
    pub fn from_kind(kind: &str) -> Option<Level> {
        Level::ALL.into_iter().find(|level| level.kind() == kind)
    }

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

/// Returned when a level kind identifier is unknown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown level kind: {0}")]
pub struct UnknownLevel(pub String);

impl FromStr for Level {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::from_kind(s).ok_or_else(|| UnknownLevel(s.to_string()))
    }
}

/// A compact set of levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LevelSet(u16);

impl LevelSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, level: Level) {
        self.0 |= level.bit();
    }

    pub fn contains(&self, level: Level) -> bool {
        self.0 & level.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// True if any member is `target` or lies beneath it.
    pub fn any_at_or_below(&self, target: Level) -> bool {
        self.iter().any(|level| level.is_at_or_below(target))
    }

    /// Members in rank order.
    pub fn iter(&self) -> impl Iterator<Item = Level> + '_ {
        Level::ALL.into_iter().filter(|level| self.contains(*level))
    }
}

impl FromIterator<Level> for LevelSet {
    fn from_iter<I: IntoIterator<Item = Level>>(iter: I) -> Self {
        let mut set = LevelSet::empty();
        for level in iter {
            set.insert(level);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ranks_never_shrink_along_a_chain() {
        for level in Level::ALL {
            if let Some(parent) = level.parent() {
                // Items and files share rank 8 with their folder.
                assert!(
                    parent.rank() <= level.rank(),
                    "{parent} should not rank above {level}"
                );
                assert!(parent.chain() == level.chain() || parent == Level::Tenant);
            }
        }
    }

    #[test]
    fn test_ord_matches_rank() {
        for pair in Level::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].less_or_equal(pair[1]));
        }
    }

    #[test]
    fn test_kind_lookup() {
        for level in Level::ALL {
            assert_eq!(level.kind().parse::<Level>(), Ok(level));
        }
        assert_eq!(Level::from_kind("sub_site"), None);
        assert!("web".parse::<Level>().is_err());
    }

    #[test]
    fn test_serde_uses_kind() {
        let json = serde_json::to_string(&Level::SiteCollection).unwrap();
        assert_eq!(json, "\"site_collection\"");
        let level: Level = serde_json::from_str("\"list_item\"").unwrap();
        assert_eq!(level, Level::ListItem);
    }

    #[test]
    fn test_at_or_below_stays_on_chain() {
        assert!(Level::File.is_at_or_below(Level::Folder));
        assert!(Level::File.is_at_or_below(Level::Tenant));
        assert!(Level::Term.is_at_or_below(Level::TermStore));
        assert!(!Level::Site.is_at_or_below(Level::TermStore));
        assert!(!Level::Term.is_at_or_below(Level::SiteCollection));
        assert!(!Level::View.is_at_or_below(Level::Folder));
        assert!(!Level::Site.is_at_or_below(Level::List));
    }

    #[test]
    fn test_level_set() {
        let set: LevelSet = [Level::Site, Level::File].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(Level::Site));
        assert!(!set.contains(Level::List));
        assert!(set.any_at_or_below(Level::List));
        assert!(!set.any_at_or_below(Level::TermStore));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Level::Site, Level::File]);
        assert!(LevelSet::empty().is_empty());
    }

    fn any_level() -> impl Strategy<Value = Level> {
        (0..Level::ALL.len()).prop_map(|i| Level::ALL[i])
    }

    proptest! {
        #[test]
        fn prop_at_or_below_within_chain_is_rank_order(a in any_level(), b in any_level()) {
            if a.is_at_or_below(b) {
                prop_assert!(b.rank() <= a.rank());
                prop_assert!(b == Level::Tenant || a.chain() == b.chain());
            }
        }

        #[test]
        fn prop_any_at_or_below_matches_members(
            members in proptest::collection::vec(any_level(), 0..6),
            target in any_level(),
        ) {
            let set: LevelSet = members.iter().copied().collect();
            let expected = members.iter().any(|l| l.is_at_or_below(target));
            prop_assert_eq!(set.any_at_or_below(target), expected);
        }
    }
}
