//! Testing utilities: a receiver that records what it is sent, and a small
//! sample tenant.
//!
//! Useful for checking receiver wiring without a real content store.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::level::{Level, LevelSet};
use crate::stores::SnapshotNode;
use crate::traits::receiver::{
    FileReceiver, FolderReceiver, ListItemReceiver, ListReceiver, Receiver, SiteCollectionReceiver,
    SiteReceiver, TenantReceiver, TermGroupReceiver, TermReceiver, TermSetReceiver,
    TermStoreReceiver, ViewReceiver,
};
use crate::traits::store::Axis;
use crate::types::config::ReceiverOptions;
use crate::types::entity::{Element, EntityKey};
use crate::types::sites::{File, Folder, List, ListItem, Site, SiteCollection, Tenant, View};
use crate::types::taxonomy::{Term, TermGroup, TermSet, TermStore};

/// What happened to a receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    RunStart,
    RunEnd,
    Start(Level),
    End(Level),
    /// End after sub-sites or sub-folders.
    EndAfterNested(Level),
    /// The only callback of a leaf level.
    Leaf(Level),
}

/// One recorded callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub receiver: String,
    pub kind: EventKind,
    pub key: Option<EntityKey>,
}

/// Renders as `"<receiver> <event> <key>"`, e.g. `"x site-start web"`.
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (level, what) = match self.kind {
            EventKind::RunStart => return write!(f, "{} run-start", self.receiver),
            EventKind::RunEnd => return write!(f, "{} run-end", self.receiver),
            EventKind::Start(level) => (level, "start"),
            EventKind::End(level) => (level, "end"),
            EventKind::EndAfterNested(level) => (level, "end-after"),
            EventKind::Leaf(level) => return write!(f, "{} {} {}", self.receiver, level, self.key_str()),
        };
        write!(f, "{} {}-{} {}", self.receiver, level, what, self.key_str())
    }
}

impl Event {
    fn key_str(&self) -> &str {
        self.key.as_ref().map(EntityKey::as_str).unwrap_or("")
    }
}

/// Shared, ordered event log. Several receivers may write to one log.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<RwLock<Vec<Event>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Every event rendered with `Display`.
    pub fn lines(&self) -> Vec<String> {
        self.events().iter().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.0.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, event: Event) {
        self.0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// A receiver active at a configurable set of levels that records every
/// callback it gets.
#[derive(Debug, Clone)]
pub struct RecordingReceiver {
    name: String,
    levels: LevelSet,
    options: ReceiverOptions,
    log: EventLog,
}

impl RecordingReceiver {
    pub fn new(name: impl Into<String>, levels: impl IntoIterator<Item = Level>) -> Self {
        Self {
            name: name.into(),
            levels: levels.into_iter().collect(),
            options: ReceiverOptions::default(),
            log: EventLog::new(),
        }
    }

    /// Active at every level.
    pub fn everywhere(name: impl Into<String>) -> Self {
        Self::new(name, Level::ALL)
    }

    pub fn with_options(mut self, options: ReceiverOptions) -> Self {
        self.options = options;
        self
    }

    /// Record into `log` instead of a private log.
    pub fn with_log(mut self, log: EventLog) -> Self {
        self.log = log;
        self
    }

    pub fn log(&self) -> EventLog {
        self.log.clone()
    }

    fn record(&self, kind: EventKind, element: &impl Element) {
        self.log.push(Event {
            receiver: self.name.clone(),
            kind,
            key: Some(element.key().clone()),
        });
    }

    fn record_run(&self, kind: EventKind) {
        self.log.push(Event {
            receiver: self.name.clone(),
            kind,
            key: None,
        });
    }
}

macro_rules! recording_pair {
    ($trait:ident, $ty:ty, $level:ident, $start:ident, $end:ident) => {
        impl $trait for RecordingReceiver {
            fn $start(&mut self, element: &$ty) {
                self.record(EventKind::Start(Level::$level), element);
            }

            fn $end(&mut self, element: &$ty) {
                self.record(EventKind::End(Level::$level), element);
            }
        }
    };
}

recording_pair!(TenantReceiver, Tenant, Tenant, on_tenant_start, on_tenant_end);
recording_pair!(TermStoreReceiver, TermStore, TermStore, on_term_store_start, on_term_store_end);
recording_pair!(TermGroupReceiver, TermGroup, TermGroup, on_term_group_start, on_term_group_end);
recording_pair!(TermSetReceiver, TermSet, TermSet, on_term_set_start, on_term_set_end);
recording_pair!(TermReceiver, Term, Term, on_term_start, on_term_end);
recording_pair!(
    SiteCollectionReceiver,
    SiteCollection,
    SiteCollection,
    on_site_collection_start,
    on_site_collection_end
);
recording_pair!(ListReceiver, List, List, on_list_start, on_list_end);

impl SiteReceiver for RecordingReceiver {
    fn on_site_start(&mut self, site: &Site) {
        self.record(EventKind::Start(Level::Site), site);
    }

    fn on_site_end(&mut self, site: &Site) {
        self.record(EventKind::End(Level::Site), site);
    }

    fn on_site_end_after_sub_sites(&mut self, site: &Site) {
        self.record(EventKind::EndAfterNested(Level::Site), site);
    }
}

impl FolderReceiver for RecordingReceiver {
    fn on_folder_start(&mut self, folder: &Folder) {
        self.record(EventKind::Start(Level::Folder), folder);
    }

    fn on_folder_end(&mut self, folder: &Folder) {
        self.record(EventKind::End(Level::Folder), folder);
    }

    fn on_folder_end_after_sub_folders(&mut self, folder: &Folder) {
        self.record(EventKind::EndAfterNested(Level::Folder), folder);
    }
}

impl ViewReceiver for RecordingReceiver {
    fn on_view(&mut self, view: &View) {
        self.record(EventKind::Leaf(Level::View), view);
    }
}

impl ListItemReceiver for RecordingReceiver {
    fn on_list_item(&mut self, list_item: &ListItem) {
        self.record(EventKind::Leaf(Level::ListItem), list_item);
    }
}

impl FileReceiver for RecordingReceiver {
    fn on_file(&mut self, file: &File) {
        self.record(EventKind::Leaf(Level::File), file);
    }
}

// Accessors answer according to the configured levels.
macro_rules! gated_accessors {
    ($($method:ident => $level:ident: $trait:ident),+ $(,)?) => {
        $(
            fn $method(&mut self) -> Option<&mut dyn $trait> {
                if self.levels.contains(Level::$level) {
                    Some(self)
                } else {
                    None
                }
            }
        )+
    };
}

impl Receiver for RecordingReceiver {
    fn name(&self) -> &str {
        &self.name
    }

    fn options(&self) -> ReceiverOptions {
        self.options
    }

    fn on_start(&mut self) {
        self.record_run(EventKind::RunStart);
    }

    fn on_end(&mut self) {
        self.record_run(EventKind::RunEnd);
    }

    gated_accessors!(
        as_tenant => Tenant: TenantReceiver,
        as_term_store => TermStore: TermStoreReceiver,
        as_term_group => TermGroup: TermGroupReceiver,
        as_term_set => TermSet: TermSetReceiver,
        as_term => Term: TermReceiver,
        as_site_collection => SiteCollection: SiteCollectionReceiver,
        as_site => Site: SiteReceiver,
        as_list => List: ListReceiver,
        as_view => View: ViewReceiver,
        as_folder => Folder: FolderReceiver,
        as_list_item => ListItem: ListItemReceiver,
        as_file => File: FileReceiver,
    );
}

/// A small tenant with both branches populated.
///
/// ```text
/// contoso
/// ├─ term store "ts" ─ group "g" ─ set "s" ─ term "t1" ─ term "t1a"
/// └─ site collection https://contoso.example.com/sites/hr
///    └─ site "hr"
///       ├─ list "docs" ─┬─ view "all"
///       │               └─ folder "docs-root"
///       │                  ├─ item "doc-1" (file, 2048 bytes)
///       │                  ├─ item "row-1"
///       │                  └─ folder "archive" ─ item "doc-2" (file, 1024 bytes)
///       ├─ list "catalog" (hidden)
///       └─ sub-site "hr-team"
/// ```
pub fn sample_tenant() -> SnapshotNode {
    let taxonomy = SnapshotNode::new(Level::TermStore, "ts")
        .field("Name", "Managed Metadata")
        .child(
            Axis::TermGroups,
            SnapshotNode::new(Level::TermGroup, "g")
                .field("Name", "People")
                .child(
                    Axis::TermSets,
                    SnapshotNode::new(Level::TermSet, "s")
                        .field("Name", "Departments")
                        .child(
                            Axis::Terms,
                            SnapshotNode::new(Level::Term, "t1")
                                .field("Name", "Engineering")
                                .field("TermsCount", 1)
                                .child(
                                    Axis::ChildTerms,
                                    SnapshotNode::new(Level::Term, "t1a")
                                        .field("Name", "Platform")
                                        .field("TermsCount", 0),
                                ),
                        ),
                ),
        );

    let archive = SnapshotNode::new(Level::Folder, "archive")
        .field("Name", "Archive")
        .field("ServerRelativeUrl", "/sites/hr/docs/Archive")
        .child(Axis::Items, file_item("doc-2", "old.docx", 1024));

    let docs = SnapshotNode::new(Level::List, "docs")
        .field("Title", "Documents")
        .field("Hidden", false)
        .field("ItemCount", 3)
        .child(
            Axis::Views,
            SnapshotNode::new(Level::View, "all").field("Title", "All Documents"),
        )
        .child(
            Axis::RootFolder,
            SnapshotNode::new(Level::Folder, "docs-root")
                .field("Name", "Documents")
                .field("ServerRelativeUrl", "/sites/hr/docs")
                .children(
                    Axis::Items,
                    [
                        file_item("doc-1", "policy.docx", 2048),
                        SnapshotNode::new(Level::ListItem, "row-1")
                            .field("Id", 2)
                            .field("FileSystemObjectType", "Invalid"),
                        SnapshotNode::new(Level::ListItem, "archive-item")
                            .field("Id", 3)
                            .field("FileSystemObjectType", "Folder"),
                    ],
                )
                .child(Axis::SubFolders, archive),
        );

    let catalog = SnapshotNode::new(Level::List, "catalog")
        .field("Title", "Master Page Gallery")
        .field("Hidden", true);

    let site = SnapshotNode::new(Level::Site, "hr")
        .field("Title", "Human Resources")
        .field("Url", "https://contoso.example.com/sites/hr")
        .children(Axis::Lists, [docs, catalog])
        .child(
            Axis::SubSites,
            SnapshotNode::new(Level::Site, "hr-team")
                .field("Title", "HR Team")
                .field("Url", "https://contoso.example.com/sites/hr/team"),
        );

    SnapshotNode::new(Level::Tenant, "contoso")
        .field("RootSiteUrl", "https://contoso.example.com")
        .child(Axis::TermStores, taxonomy)
        .child(
            Axis::SiteCollections,
            SnapshotNode::new(Level::SiteCollection, "https://contoso.example.com/sites/hr")
                .field("Url", "https://contoso.example.com/sites/hr")
                .child(Axis::RootSite, site),
        )
}

fn file_item(key: &str, name: &str, length: u64) -> SnapshotNode {
    SnapshotNode::new(Level::ListItem, key)
        .field("FileSystemObjectType", "File")
        .field("FileRef", format!("/sites/hr/docs/{name}"))
        .field("Name", name)
        .field("Length", length)
}
