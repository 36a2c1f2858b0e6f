//! Receivers and their per-level capabilities.
//!
//! A receiver opts into a level by implementing that level's capability
//! trait and exposing it through the matching `as_*` accessor on
//! [`Receiver`]. Every callback has a no-op default, so implementers only
//! write the ones they need:
//!
//! ```
//! use tenant_runner::{receiver_capabilities, Receiver, SiteReceiver};
//! use tenant_runner::types::sites::Site;
//!
//! #[derive(Default)]
//! struct SiteTitles(Vec<String>);
//!
//! impl SiteReceiver for SiteTitles {
//!     fn on_site_start(&mut self, site: &Site) {
//!         self.0.extend(site.title().map(String::from));
//!     }
//! }
//!
//! impl Receiver for SiteTitles {
//!     receiver_capabilities!(site);
//! }
//! ```
//!
//! The set of levels a receiver is active at is worked out once, when it is
//! registered, by asking each accessor.

use crate::level::{Level, LevelSet};
use crate::types::config::ReceiverOptions;
use crate::types::sites::{File, Folder, List, ListItem, Site, SiteCollection, Tenant, View};
use crate::types::taxonomy::{Term, TermGroup, TermSet, TermStore};

/// A handler invoked while the tenant tree is crawled.
///
/// Implementing a capability trait such as [`SiteReceiver`] is not enough on
/// its own. The receiver is active at a level only when the matching `as_*`
/// accessor returns it, which is what listing the level in
/// [`receiver_capabilities!`](crate::receiver_capabilities) generates. A
/// capability left out of that list is never called.
pub trait Receiver: Send {
    /// Name used in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Crawl options, read once at registration.
    fn options(&self) -> ReceiverOptions {
        ReceiverOptions::default()
    }

    /// Start of the whole run.
    fn on_start(&mut self) {}

    /// End of the whole run. Not called when the run fails.
    fn on_end(&mut self) {}

    fn as_tenant(&mut self) -> Option<&mut dyn TenantReceiver> {
        None
    }

    fn as_term_store(&mut self) -> Option<&mut dyn TermStoreReceiver> {
        None
    }

    fn as_term_group(&mut self) -> Option<&mut dyn TermGroupReceiver> {
        None
    }

    fn as_term_set(&mut self) -> Option<&mut dyn TermSetReceiver> {
        None
    }

    fn as_term(&mut self) -> Option<&mut dyn TermReceiver> {
        None
    }

    fn as_site_collection(&mut self) -> Option<&mut dyn SiteCollectionReceiver> {
        None
    }

    fn as_site(&mut self) -> Option<&mut dyn SiteReceiver> {
        None
    }

    fn as_list(&mut self) -> Option<&mut dyn ListReceiver> {
        None
    }

    fn as_view(&mut self) -> Option<&mut dyn ViewReceiver> {
        None
    }

    fn as_folder(&mut self) -> Option<&mut dyn FolderReceiver> {
        None
    }

    fn as_list_item(&mut self) -> Option<&mut dyn ListItemReceiver> {
        None
    }

    fn as_file(&mut self) -> Option<&mut dyn FileReceiver> {
        None
    }
}

impl dyn Receiver {
    /// Whether the receiver exposes the capability for `level`.
    pub fn has_capability(&mut self, level: Level) -> bool {
        match level {
            Level::Tenant => self.as_tenant().is_some(),
            Level::TermStore => self.as_term_store().is_some(),
            Level::TermGroup => self.as_term_group().is_some(),
            Level::TermSet => self.as_term_set().is_some(),
            Level::Term => self.as_term().is_some(),
            Level::SiteCollection => self.as_site_collection().is_some(),
            Level::Site => self.as_site().is_some(),
            Level::List => self.as_list().is_some(),
            Level::View => self.as_view().is_some(),
            Level::Folder => self.as_folder().is_some(),
            Level::ListItem => self.as_list_item().is_some(),
            Level::File => self.as_file().is_some(),
        }
    }

    /// Every level the receiver exposes a capability for.
    pub fn capabilities(&mut self) -> LevelSet {
        Level::ALL
            .into_iter()
            .filter(|level| self.has_capability(*level))
            .collect()
    }
}

pub trait TenantReceiver {
    fn on_tenant_start(&mut self, _tenant: &Tenant) {}
    fn on_tenant_end(&mut self, _tenant: &Tenant) {}
}

pub trait TermStoreReceiver {
    fn on_term_store_start(&mut self, _term_store: &TermStore) {}
    fn on_term_store_end(&mut self, _term_store: &TermStore) {}
}

pub trait TermGroupReceiver {
    fn on_term_group_start(&mut self, _term_group: &TermGroup) {}
    fn on_term_group_end(&mut self, _term_group: &TermGroup) {}
}

pub trait TermSetReceiver {
    fn on_term_set_start(&mut self, _term_set: &TermSet) {}
    fn on_term_set_end(&mut self, _term_set: &TermSet) {}
}

/// Child terms are crawled between a term's start and end.
pub trait TermReceiver {
    fn on_term_start(&mut self, _term: &Term) {}
    fn on_term_end(&mut self, _term: &Term) {}
}

pub trait SiteCollectionReceiver {
    fn on_site_collection_start(&mut self, _site_collection: &SiteCollection) {}
    fn on_site_collection_end(&mut self, _site_collection: &SiteCollection) {}
}

/// Sites get a third event once their sub-sites are done.
pub trait SiteReceiver {
    fn on_site_start(&mut self, _site: &Site) {}

    /// After the site's lists, before its sub-sites.
    fn on_site_end(&mut self, _site: &Site) {}

    /// After the site's sub-sites. Only fired when sub-sites were crawled.
    fn on_site_end_after_sub_sites(&mut self, _site: &Site) {}
}

pub trait ListReceiver {
    fn on_list_start(&mut self, _list: &List) {}
    fn on_list_end(&mut self, _list: &List) {}
}

pub trait ViewReceiver {
    fn on_view(&mut self, _view: &View) {}
}

/// Folders get a third event once their sub-folders are done.
pub trait FolderReceiver {
    fn on_folder_start(&mut self, _folder: &Folder) {}

    /// After the folder's items, before its sub-folders.
    fn on_folder_end(&mut self, _folder: &Folder) {}

    /// After the folder's sub-folders. Only fired when sub-folders were
    /// crawled.
    fn on_folder_end_after_sub_folders(&mut self, _folder: &Folder) {}
}

pub trait ListItemReceiver {
    fn on_list_item(&mut self, _list_item: &ListItem) {}
}

pub trait FileReceiver {
    fn on_file(&mut self, _file: &File) {}
}

/// Implement the `as_*` accessors of [`Receiver`] for the listed levels.
///
/// The receiver type must implement the capability trait of each level
/// listed.
///
/// # Example
/// ```ignore
/// impl Receiver for MyReceiver {
///     receiver_capabilities!(site, folder, file);
/// }
/// ```
#[macro_export]
macro_rules! receiver_capabilities {
    (@one tenant) => {
        fn as_tenant(&mut self) -> Option<&mut dyn $crate::TenantReceiver> {
            Some(self)
        }
    };
    (@one term_store) => {
        fn as_term_store(&mut self) -> Option<&mut dyn $crate::TermStoreReceiver> {
            Some(self)
        }
    };
    (@one term_group) => {
        fn as_term_group(&mut self) -> Option<&mut dyn $crate::TermGroupReceiver> {
            Some(self)
        }
    };
    (@one term_set) => {
        fn as_term_set(&mut self) -> Option<&mut dyn $crate::TermSetReceiver> {
            Some(self)
        }
    };
    (@one term) => {
        fn as_term(&mut self) -> Option<&mut dyn $crate::TermReceiver> {
            Some(self)
        }
    };
    (@one site_collection) => {
        fn as_site_collection(&mut self) -> Option<&mut dyn $crate::SiteCollectionReceiver> {
            Some(self)
        }
    };
    (@one site) => {
        fn as_site(&mut self) -> Option<&mut dyn $crate::SiteReceiver> {
            Some(self)
        }
    };
    (@one list) => {
        fn as_list(&mut self) -> Option<&mut dyn $crate::ListReceiver> {
            Some(self)
        }
    };
    (@one view) => {
        fn as_view(&mut self) -> Option<&mut dyn $crate::ViewReceiver> {
            Some(self)
        }
    };
    (@one folder) => {
        fn as_folder(&mut self) -> Option<&mut dyn $crate::FolderReceiver> {
            Some(self)
        }
    };
    (@one list_item) => {
        fn as_list_item(&mut self) -> Option<&mut dyn $crate::ListItemReceiver> {
            Some(self)
        }
    };
    (@one file) => {
        fn as_file(&mut self) -> Option<&mut dyn $crate::FileReceiver> {
            Some(self)
        }
    };
    ($($level:ident),+ $(,)?) => {
        $($crate::receiver_capabilities!(@one $level);)+
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Silent;

    impl Receiver for Silent {}

    struct SitesAndFiles;

    impl SiteReceiver for SitesAndFiles {}
    impl FileReceiver for SitesAndFiles {}

    impl Receiver for SitesAndFiles {
        receiver_capabilities!(site, file);
    }

    struct UnlistedFolders;

    impl SiteReceiver for UnlistedFolders {}
    impl FolderReceiver for UnlistedFolders {}

    impl Receiver for UnlistedFolders {
        receiver_capabilities!(site);
    }

    #[test]
    fn test_no_capabilities_means_no_levels() {
        let mut receiver: Box<dyn Receiver> = Box::new(Silent);
        assert!(receiver.capabilities().is_empty());
    }

    #[test]
    fn test_capabilities_follow_accessors() {
        let mut receiver: Box<dyn Receiver> = Box::new(SitesAndFiles);
        let levels = receiver.capabilities();
        assert_eq!(levels.iter().collect::<Vec<_>>(), vec![Level::Site, Level::File]);
    }

    #[test]
    fn test_unlisted_capability_stays_inactive() {
        let mut receiver: Box<dyn Receiver> = Box::new(UnlistedFolders);
        assert!(receiver.as_folder().is_none());
        assert_eq!(receiver.capabilities().iter().collect::<Vec<_>>(), vec![Level::Site]);
    }

    #[test]
    fn test_default_name_is_type_name() {
        let receiver = SitesAndFiles;
        assert!(receiver.name().ends_with("SitesAndFiles"));
    }
}
