//! Content store trait and child axes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StoreResult;
use crate::level::Level;
use crate::session::Session;
use crate::types::entity::{EntityKey, EntityRecord, Fields};

/// A category of children an entity can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    TermStores,
    SiteCollections,
    TermGroups,
    TermSets,
    Terms,
    ChildTerms,
    RootSite,
    Lists,
    SubSites,
    Views,
    RootFolder,
    Items,
    SubFolders,
}

impl Axis {
    /// Levels the children of this axis may route to. An axis is worth
    /// enumerating only if some receiver is active at or below one of them.
    pub const fn child_levels(self) -> &'static [Level] {
        match self {
            Axis::TermStores => &[Level::TermStore],
            Axis::SiteCollections => &[Level::SiteCollection],
            Axis::TermGroups => &[Level::TermGroup],
            Axis::TermSets => &[Level::TermSet],
            Axis::Terms | Axis::ChildTerms => &[Level::Term],
            Axis::RootSite | Axis::SubSites => &[Level::Site],
            Axis::Lists => &[Level::List],
            Axis::Views => &[Level::View],
            Axis::RootFolder | Axis::SubFolders => &[Level::Folder],
            Axis::Items => &[Level::ListItem, Level::File],
        }
    }

    /// True for axes whose children are of the same kind as their parent
    /// and are processed after the parent's end event.
    pub const fn is_nested(self) -> bool {
        matches!(self, Axis::SubSites | Axis::SubFolders)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Axis::TermStores => "term_stores",
            Axis::SiteCollections => "site_collections",
            Axis::TermGroups => "term_groups",
            Axis::TermSets => "term_sets",
            Axis::Terms => "terms",
            Axis::ChildTerms => "child_terms",
            Axis::RootSite => "root_site",
            Axis::Lists => "lists",
            Axis::SubSites => "sub_sites",
            Axis::Views => "views",
            Axis::RootFolder => "root_folder",
            Axis::Items => "items",
            Axis::SubFolders => "sub_folders",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The external content store the crawl reads from.
///
/// Implementations own transport, batching, paging and retries. The runner
/// only needs these two calls and awaits each one before issuing the next.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Load the named fields of an entity.
    ///
    /// Fields the store doesn't know are left out of the result.
    async fn hydrate(
        &self,
        session: &Session,
        level: Level,
        key: &EntityKey,
        fields: &[&str],
    ) -> StoreResult<Fields>;

    /// List the children of an entity along one axis, in store order.
    async fn children(
        &self,
        session: &Session,
        parent: &EntityKey,
        axis: Axis,
    ) -> StoreResult<Vec<EntityRecord>>;
}

#[async_trait]
impl<S: ContentStore + ?Sized> ContentStore for std::sync::Arc<S> {
    async fn hydrate(
        &self,
        session: &Session,
        level: Level,
        key: &EntityKey,
        fields: &[&str],
    ) -> StoreResult<Fields> {
        (**self).hydrate(session, level, key, fields).await
    }

    async fn children(
        &self,
        session: &Session,
        parent: &EntityKey,
        axis: Axis,
    ) -> StoreResult<Vec<EntityRecord>> {
        (**self).children(session, parent, axis).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_sub_sites_and_sub_folders_nest() {
        let nested: Vec<_> = [
            Axis::TermStores,
            Axis::SiteCollections,
            Axis::ChildTerms,
            Axis::Lists,
            Axis::SubSites,
            Axis::Items,
            Axis::SubFolders,
        ]
        .into_iter()
        .filter(|axis| axis.is_nested())
        .collect();
        assert_eq!(nested, vec![Axis::SubSites, Axis::SubFolders]);
    }

    #[test]
    fn test_items_route_to_list_items_and_files() {
        assert_eq!(Axis::Items.child_levels(), &[Level::ListItem, Level::File]);
        assert_eq!(Axis::RootFolder.child_levels(), &[Level::Folder]);
    }

    #[test]
    fn test_axis_serde_name_matches_display() {
        let json = serde_json::to_string(&Axis::SubFolders).unwrap();
        assert_eq!(json, format!("\"{}\"", Axis::SubFolders));
    }
}
