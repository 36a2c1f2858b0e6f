//! End-to-end crawls over small in-memory tenants.
//!
//! Each test builds a snapshot, registers receivers and checks both what the
//! receivers saw and which store calls the run issued.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tenant_runner::testing::RecordingReceiver;
use tenant_runner::types::sites::Site;
use tenant_runner::{
    receiver_capabilities, Axis, ContentStore, Credentials, EntityKey, EntityRecord, Fields,
    Level, MemoryStore, Receiver, ReceiverOptions, RunningManager, Session, SiteReceiver,
    SnapshotNode, StoreResult,
};

fn session() -> Session {
    Session::new("https://contoso-admin.example.com", Credentials::anonymous()).unwrap()
}

fn manager(snapshot: SnapshotNode) -> RunningManager<MemoryStore> {
    RunningManager::new(MemoryStore::from_snapshot(snapshot).unwrap(), session())
}

/// Tenant → site collection → root site → one list with a root folder.
fn with_root_folder(folder: SnapshotNode) -> SnapshotNode {
    SnapshotNode::new(Level::Tenant, "contoso").child(
        Axis::SiteCollections,
        SnapshotNode::new(Level::SiteCollection, "https://contoso.example.com").child(
            Axis::RootSite,
            SnapshotNode::new(Level::Site, "web").child(
                Axis::Lists,
                SnapshotNode::new(Level::List, "docs").child(Axis::RootFolder, folder),
            ),
        ),
    )
}

/// Counts site starts and nothing else.
struct SiteStarts(Arc<AtomicUsize>);

impl SiteReceiver for SiteStarts {
    fn on_site_start(&mut self, _site: &Site) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

impl Receiver for SiteStarts {
    receiver_capabilities!(site);
}

#[tokio::test]
async fn test_site_only_receiver_prunes_taxonomy_and_lists() {
    let snapshot = SnapshotNode::new(Level::Tenant, "contoso").children(
        Axis::SiteCollections,
        [
            SnapshotNode::new(Level::SiteCollection, "https://contoso.example.com/sites/one")
                .child(Axis::RootSite, SnapshotNode::new(Level::Site, "one")),
            SnapshotNode::new(Level::SiteCollection, "https://contoso.example.com/sites/two")
                .child(Axis::RootSite, SnapshotNode::new(Level::Site, "two")),
        ],
    );

    let starts = Arc::new(AtomicUsize::new(0));
    let mut manager = manager(snapshot);
    manager.register(SiteStarts(starts.clone()));

    let tenant = manager.store().tenant();
    let report = manager.run(tenant).await.unwrap();

    assert_eq!(starts.load(Ordering::SeqCst), 2);
    assert_eq!(manager.store().children_calls(Axis::TermStores), 0);
    assert_eq!(manager.store().children_calls(Axis::Lists), 0);
    assert_eq!(report.nodes_at(Level::Site), 2);
    assert_eq!(report.nodes_at(Level::TermStore), 0);
}

#[tokio::test]
async fn test_sub_site_axis_stays_closed_when_no_receiver_includes_sub_sites() {
    let snapshot = SnapshotNode::new(Level::Tenant, "contoso").child(
        Axis::SiteCollections,
        SnapshotNode::new(Level::SiteCollection, "https://contoso.example.com")
            .child(Axis::RootSite, SnapshotNode::new(Level::Site, "web")),
    );

    let receiver = RecordingReceiver::new("x", [Level::Site])
        .with_options(ReceiverOptions::new().with_sub_sites(false));
    let log = receiver.log();
    let mut manager = manager(snapshot);
    manager.register(receiver);

    let tenant = manager.store().tenant();
    manager.run(tenant).await.unwrap();

    assert_eq!(manager.store().children_calls(Axis::SubSites), 0);
    assert_eq!(
        log.lines(),
        vec!["x run-start", "x site-start web", "x site-end web", "x run-end"]
    );
}

#[tokio::test]
async fn test_hidden_list_is_enumerated_but_not_dispatched() {
    let snapshot = SnapshotNode::new(Level::Tenant, "contoso").child(
        Axis::SiteCollections,
        SnapshotNode::new(Level::SiteCollection, "https://contoso.example.com").child(
            Axis::RootSite,
            SnapshotNode::new(Level::Site, "web").children(
                Axis::Lists,
                [
                    SnapshotNode::new(Level::List, "a").field("Hidden", false),
                    SnapshotNode::new(Level::List, "b").field("Hidden", true),
                    SnapshotNode::new(Level::List, "c"),
                ],
            ),
        ),
    );

    let receiver = RecordingReceiver::new("y", [Level::List]);
    let log = receiver.log();
    let mut manager = manager(snapshot);
    manager.register(receiver);

    let tenant = manager.store().tenant();
    manager.run(tenant).await.unwrap();

    assert_eq!(manager.store().children_calls(Axis::Lists), 1);
    let starts: Vec<_> = log
        .lines()
        .into_iter()
        .filter(|line| line.contains("list-start"))
        .collect();
    assert_eq!(starts, vec!["y list-start a", "y list-start c"]);
}

#[tokio::test]
async fn test_folder_events_nest_sub_folders_after_end() {
    let folder = SnapshotNode::new(Level::Folder, "root")
        .children(
            Axis::Items,
            [
                SnapshotNode::new(Level::ListItem, "row"),
                SnapshotNode::new(Level::ListItem, "doc").field("FileSystemObjectType", "File"),
            ],
        )
        .children(
            Axis::SubFolders,
            [
                SnapshotNode::new(Level::Folder, "sub1"),
                SnapshotNode::new(Level::Folder, "sub2"),
            ],
        );

    let receiver = RecordingReceiver::new("z", [Level::Folder, Level::ListItem, Level::File]);
    let log = receiver.log();
    let mut manager = manager(with_root_folder(folder));
    manager.register(receiver);

    let tenant = manager.store().tenant();
    manager.run(tenant).await.unwrap();

    assert_eq!(
        log.lines(),
        vec![
            "z run-start",
            "z folder-start root",
            "z list_item row",
            "z file doc",
            "z folder-end root",
            "z folder-start sub1",
            "z folder-end sub1",
            "z folder-end-after sub1",
            "z folder-start sub2",
            "z folder-end sub2",
            "z folder-end-after sub2",
            "z folder-end-after root",
            "z run-end",
        ]
    );
}

#[tokio::test]
async fn test_no_receivers_only_hydrates_the_tenant() {
    let mut manager = manager(tenant_runner::testing::sample_tenant());

    let tenant = manager.store().tenant();
    let report = manager.run(tenant).await.unwrap();

    assert_eq!(manager.store().calls().len(), 1);
    assert_eq!(manager.store().hydrate_calls(Level::Tenant), 1);
    assert_eq!(report.store_calls, 1);
    assert_eq!(report.total_nodes(), 1);
    assert_eq!(report.pruned_axes, 2);
    assert!(report.finished_at.is_some());
}

#[tokio::test]
async fn test_run_boundaries_reach_receivers_active_nowhere() {
    let receiver = RecordingReceiver::new("idle", []);
    let log = receiver.log();
    let mut manager = manager(tenant_runner::testing::sample_tenant());
    manager.register(receiver);

    let tenant = manager.store().tenant();
    manager.run(tenant).await.unwrap();

    assert_eq!(log.lines(), vec!["idle run-start", "idle run-end"]);
    assert_eq!(manager.store().calls().len(), 1);
}

/// Enumerates keys and levels only, leaving every field to hydration.
struct KeysOnly(MemoryStore);

#[async_trait]
impl ContentStore for KeysOnly {
    async fn hydrate(
        &self,
        session: &Session,
        level: Level,
        key: &EntityKey,
        fields: &[&str],
    ) -> StoreResult<Fields> {
        self.0.hydrate(session, level, key, fields).await
    }

    async fn children(
        &self,
        session: &Session,
        parent: &EntityKey,
        axis: Axis,
    ) -> StoreResult<Vec<EntityRecord>> {
        let records = self.0.children(session, parent, axis).await?;
        Ok(records
            .into_iter()
            .map(|record| EntityRecord::new(record.level, record.key))
            .collect())
    }
}

#[tokio::test]
async fn test_items_route_on_hydrated_type_when_enumeration_omits_it() {
    let folder = SnapshotNode::new(Level::Folder, "root").children(
        Axis::Items,
        [
            SnapshotNode::new(Level::ListItem, "doc").field("FileSystemObjectType", "File"),
            SnapshotNode::new(Level::ListItem, "scan").field("FileSystemObjectType", 0),
            SnapshotNode::new(Level::ListItem, "nested").field("FileSystemObjectType", "Folder"),
            SnapshotNode::new(Level::ListItem, "row"),
        ],
    );
    let store = KeysOnly(MemoryStore::from_snapshot(with_root_folder(folder)).unwrap());
    let tenant = store.0.tenant();

    let receiver = RecordingReceiver::new("z", [Level::ListItem, Level::File]);
    let log = receiver.log();
    let mut manager = RunningManager::new(store, session());
    manager.register(receiver);
    manager.run(tenant).await.unwrap();

    assert_eq!(
        log.lines(),
        vec![
            "z run-start",
            "z file doc",
            "z file scan",
            "z list_item row",
            "z run-end",
        ]
    );
    assert_eq!(manager.store().0.hydrate_calls(Level::File), 2);
}
