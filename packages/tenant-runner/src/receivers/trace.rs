//! Logs every event of a crawl.

use crate::receiver_capabilities;
use crate::traits::receiver::{
    FileReceiver, FolderReceiver, ListItemReceiver, ListReceiver, Receiver, SiteCollectionReceiver,
    SiteReceiver, TenantReceiver, TermGroupReceiver, TermReceiver, TermSetReceiver,
    TermStoreReceiver, ViewReceiver,
};
use crate::types::config::ReceiverOptions;
use crate::types::entity::Element;
use crate::types::sites::{File, Folder, List, ListItem, Site, SiteCollection, Tenant, View};
use crate::types::taxonomy::{Term, TermGroup, TermSet, TermStore};

/// Emits one `info` event per callback, indented by depth.
#[derive(Debug, Default)]
pub struct TraceReceiver {
    options: ReceiverOptions,
    depth: usize,
}

impl TraceReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: ReceiverOptions) -> Self {
        self.options = options;
        self
    }

    fn open(&mut self, event: &str, element: &impl Element) {
        self.emit(event, element);
        self.depth += 1;
    }

    fn close(&mut self, event: &str, element: &impl Element) {
        self.depth = self.depth.saturating_sub(1);
        self.emit(event, element);
    }

    fn emit(&self, event: &str, element: &impl Element) {
        tracing::info!(
            "{:indent$}{} {}",
            "",
            event,
            element.key(),
            indent = self.depth * 2
        );
    }
}

impl TenantReceiver for TraceReceiver {
    fn on_tenant_start(&mut self, tenant: &Tenant) {
        self.open("tenant start", tenant);
    }

    fn on_tenant_end(&mut self, tenant: &Tenant) {
        self.close("tenant end", tenant);
    }
}

impl TermStoreReceiver for TraceReceiver {
    fn on_term_store_start(&mut self, term_store: &TermStore) {
        self.open("term store start", term_store);
    }

    fn on_term_store_end(&mut self, term_store: &TermStore) {
        self.close("term store end", term_store);
    }
}

impl TermGroupReceiver for TraceReceiver {
    fn on_term_group_start(&mut self, term_group: &TermGroup) {
        self.open("term group start", term_group);
    }

    fn on_term_group_end(&mut self, term_group: &TermGroup) {
        self.close("term group end", term_group);
    }
}

impl TermSetReceiver for TraceReceiver {
    fn on_term_set_start(&mut self, term_set: &TermSet) {
        self.open("term set start", term_set);
    }

    fn on_term_set_end(&mut self, term_set: &TermSet) {
        self.close("term set end", term_set);
    }
}

impl TermReceiver for TraceReceiver {
    fn on_term_start(&mut self, term: &Term) {
        self.open("term start", term);
    }

    fn on_term_end(&mut self, term: &Term) {
        self.close("term end", term);
    }
}

impl SiteCollectionReceiver for TraceReceiver {
    fn on_site_collection_start(&mut self, site_collection: &SiteCollection) {
        self.open("site collection start", site_collection);
    }

    fn on_site_collection_end(&mut self, site_collection: &SiteCollection) {
        self.close("site collection end", site_collection);
    }
}

// End-after events are not always fired, so end is what closes the depth.
impl SiteReceiver for TraceReceiver {
    fn on_site_start(&mut self, site: &Site) {
        self.open("site start", site);
    }

    fn on_site_end(&mut self, site: &Site) {
        self.close("site end", site);
    }

    fn on_site_end_after_sub_sites(&mut self, site: &Site) {
        self.emit("site end after sub-sites", site);
    }
}

impl ListReceiver for TraceReceiver {
    fn on_list_start(&mut self, list: &List) {
        self.open("list start", list);
    }

    fn on_list_end(&mut self, list: &List) {
        self.close("list end", list);
    }
}

impl ViewReceiver for TraceReceiver {
    fn on_view(&mut self, view: &View) {
        self.emit("view", view);
    }
}

impl FolderReceiver for TraceReceiver {
    fn on_folder_start(&mut self, folder: &Folder) {
        self.open("folder start", folder);
    }

    fn on_folder_end(&mut self, folder: &Folder) {
        self.close("folder end", folder);
    }

    fn on_folder_end_after_sub_folders(&mut self, folder: &Folder) {
        self.emit("folder end after sub-folders", folder);
    }
}

impl ListItemReceiver for TraceReceiver {
    fn on_list_item(&mut self, list_item: &ListItem) {
        self.emit("list item", list_item);
    }
}

impl FileReceiver for TraceReceiver {
    fn on_file(&mut self, file: &File) {
        self.emit("file", file);
    }
}

impl Receiver for TraceReceiver {
    fn name(&self) -> &str {
        "trace"
    }

    fn options(&self) -> ReceiverOptions {
        self.options
    }

    receiver_capabilities!(
        tenant,
        term_store,
        term_group,
        term_set,
        term,
        site_collection,
        site,
        list,
        view,
        folder,
        list_item,
        file,
    );
}
