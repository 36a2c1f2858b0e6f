//! Counts what a crawl finds.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

use crate::receiver_capabilities;
use crate::traits::receiver::{
    FileReceiver, FolderReceiver, ListItemReceiver, ListReceiver, Receiver, SiteCollectionReceiver,
    SiteReceiver, TermReceiver, TermSetReceiver, TermStoreReceiver,
};
use crate::types::config::ReceiverOptions;
use crate::types::sites::{File, Folder, List, ListItem, Site, SiteCollection};
use crate::types::taxonomy::{Term, TermSet, TermStore};

/// Totals gathered by an [`InventoryReceiver`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub term_stores: usize,
    pub term_sets: usize,
    pub terms: usize,
    pub site_collections: usize,
    pub sites: usize,
    pub sub_sites: usize,
    pub lists: usize,
    pub hidden_lists: usize,
    pub folders: usize,
    pub list_items: usize,
    pub files: usize,
    pub file_bytes: u64,
}

/// Read side of an inventory that is being filled by a run.
#[derive(Debug, Clone, Default)]
pub struct InventoryHandle(Arc<RwLock<Inventory>>);

impl InventoryHandle {
    pub fn snapshot(&self) -> Inventory {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn update(&self, f: impl FnOnce(&mut Inventory)) {
        f(&mut self.0.write().unwrap_or_else(PoisonError::into_inner));
    }
}

/// Tallies taxonomy and site content. Options decide whether sub-sites and
/// hidden lists are counted.
#[derive(Debug, Default)]
pub struct InventoryReceiver {
    inventory: InventoryHandle,
    options: ReceiverOptions,
}

impl InventoryReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: ReceiverOptions) -> Self {
        self.options = options;
        self
    }

    /// Handle for reading the totals once the run is over.
    pub fn handle(&self) -> InventoryHandle {
        self.inventory.clone()
    }
}

impl TermStoreReceiver for InventoryReceiver {
    fn on_term_store_start(&mut self, _term_store: &TermStore) {
        self.inventory.update(|i| i.term_stores += 1);
    }
}

impl TermSetReceiver for InventoryReceiver {
    fn on_term_set_start(&mut self, _term_set: &TermSet) {
        self.inventory.update(|i| i.term_sets += 1);
    }
}

impl TermReceiver for InventoryReceiver {
    fn on_term_start(&mut self, _term: &Term) {
        self.inventory.update(|i| i.terms += 1);
    }
}

impl SiteCollectionReceiver for InventoryReceiver {
    fn on_site_collection_start(&mut self, _site_collection: &SiteCollection) {
        self.inventory.update(|i| i.site_collections += 1);
    }
}

impl SiteReceiver for InventoryReceiver {
    fn on_site_start(&mut self, site: &Site) {
        let sub_site = site.is_sub_site();
        self.inventory.update(|i| {
            i.sites += 1;
            if sub_site {
                i.sub_sites += 1;
            }
        });
    }
}

impl ListReceiver for InventoryReceiver {
    fn on_list_start(&mut self, list: &List) {
        let hidden = list.is_hidden();
        self.inventory.update(|i| {
            i.lists += 1;
            if hidden {
                i.hidden_lists += 1;
            }
        });
    }
}

impl FolderReceiver for InventoryReceiver {
    fn on_folder_start(&mut self, _folder: &Folder) {
        self.inventory.update(|i| i.folders += 1);
    }
}

impl ListItemReceiver for InventoryReceiver {
    fn on_list_item(&mut self, _list_item: &ListItem) {
        self.inventory.update(|i| i.list_items += 1);
    }
}

impl FileReceiver for InventoryReceiver {
    fn on_file(&mut self, file: &File) {
        let bytes = file.length().unwrap_or(0);
        self.inventory.update(|i| {
            i.files += 1;
            i.file_bytes += bytes;
        });
    }
}

impl Receiver for InventoryReceiver {
    fn name(&self) -> &str {
        "inventory"
    }

    fn options(&self) -> ReceiverOptions {
        self.options
    }

    receiver_capabilities!(
        term_store,
        term_set,
        term,
        site_collection,
        site,
        list,
        folder,
        list_item,
        file,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Credentials, Session};
    use crate::stores::MemoryStore;
    use crate::testing::sample_tenant;
    use crate::RunningManager;

    async fn crawl(receiver: InventoryReceiver) -> Inventory {
        let handle = receiver.handle();
        let store = MemoryStore::from_snapshot(sample_tenant()).unwrap();
        let tenant = store.tenant();
        let session = Session::new("https://contoso-admin.example.com", Credentials::anonymous())
            .unwrap();

        let mut manager = RunningManager::new(store, session);
        manager.register(receiver);
        manager.run(tenant).await.unwrap();
        handle.snapshot()
    }

    #[tokio::test]
    async fn test_counts_sample_tenant() {
        let inventory = crawl(InventoryReceiver::new()).await;
        assert_eq!(
            inventory,
            Inventory {
                term_stores: 1,
                term_sets: 1,
                terms: 2,
                site_collections: 1,
                sites: 2,
                sub_sites: 1,
                lists: 1,
                hidden_lists: 0,
                folders: 2,
                list_items: 1,
                files: 2,
                file_bytes: 3072,
            }
        );
    }

    #[tokio::test]
    async fn test_options_change_what_is_counted() {
        let options = ReceiverOptions::new()
            .with_hidden_lists(true)
            .with_sub_sites(false);
        let inventory = crawl(InventoryReceiver::new().with_options(options)).await;
        assert_eq!(inventory.sites, 1);
        assert_eq!(inventory.sub_sites, 0);
        assert_eq!(inventory.lists, 2);
        assert_eq!(inventory.hidden_lists, 1);
    }
}
