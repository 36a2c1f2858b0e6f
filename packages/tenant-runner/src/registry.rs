//! The ordered set of registered receivers and the queries the runner asks
//! of it.

use std::fmt;

use crate::level::{Level, LevelSet};
use crate::traits::receiver::Receiver;
use crate::traits::store::Axis;
use crate::types::config::ReceiverOptions;

/// A receiver together with what was learned about it at registration.
pub struct Registration {
    receiver: Box<dyn Receiver>,
    name: String,
    levels: LevelSet,
    options: ReceiverOptions,
}

impl Registration {
    /// Probes the receiver's capabilities and options. This is the only
    /// time they are read.
    pub fn new(mut receiver: Box<dyn Receiver>) -> Self {
        let levels = receiver.capabilities();
        let options = receiver.options();
        let name = receiver.name().to_string();
        Self {
            receiver,
            name,
            levels,
            options,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Levels the receiver is active at.
    pub fn levels(&self) -> LevelSet {
        self.levels
    }

    pub fn options(&self) -> ReceiverOptions {
        self.options
    }

    pub fn is_active_at(&self, level: Level) -> bool {
        self.levels.contains(level)
    }

    /// True if the receiver is active at `level` or anywhere beneath it.
    pub fn is_active_at_or_below(&self, level: Level) -> bool {
        self.levels.any_at_or_below(level)
    }

    /// True if the receiver wants the children of `axis` or anything
    /// beneath them.
    pub fn wants(&self, axis: Axis) -> bool {
        let wanted = axis
            .child_levels()
            .iter()
            .any(|level| self.is_active_at_or_below(*level));
        match axis {
            Axis::SubSites => wanted && self.options.include_sub_sites,
            _ => wanted,
        }
    }

    pub(crate) fn receiver_mut(&mut self) -> &mut dyn Receiver {
        self.receiver.as_mut()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("levels", &self.levels.iter().collect::<Vec<_>>())
            .field("options", &self.options)
            .finish()
    }
}

/// Registered receivers in registration order.
#[derive(Debug, Default)]
pub struct Registry {
    registrations: Vec<Registration>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, receiver: Box<dyn Receiver>) -> &Registration {
        let registration = Registration::new(receiver);
        tracing::debug!(
            receiver = %registration.name(),
            levels = registration.levels().len(),
            "Registered receiver"
        );
        self.registrations.push(registration);
        &self.registrations[self.registrations.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.registrations.iter()
    }

    pub fn any_active_at_or_below(&self, level: Level) -> bool {
        self.registrations
            .iter()
            .any(|r| r.is_active_at_or_below(level))
    }

    pub fn any_with_include_sub_sites(&self) -> bool {
        self.registrations
            .iter()
            .any(|r| r.options.include_sub_sites)
    }

    pub fn any_with_include_hidden_lists(&self) -> bool {
        self.registrations
            .iter()
            .any(|r| r.options.include_hidden_lists)
    }

    /// Gate for an axis: open when any registered receiver wants it.
    pub fn is_axis_open(&self, axis: Axis) -> bool {
        self.registrations.iter().any(|r| r.wants(axis))
    }

    /// Indices of the receivers active at `level` that `admit` accepts.
    pub(crate) fn active_for(
        &self,
        level: Level,
        admit: impl Fn(&ReceiverOptions) -> bool,
    ) -> Vec<usize> {
        self.registrations
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_active_at(level) && admit(&r.options))
            .map(|(i, _)| i)
            .collect()
    }

    /// Calls `f` on the receivers at `indices`, in order.
    pub(crate) fn dispatch(&mut self, indices: &[usize], mut f: impl FnMut(&mut dyn Receiver)) {
        for &index in indices {
            if let Some(registration) = self.registrations.get_mut(index) {
                f(registration.receiver_mut());
            }
        }
    }

    /// Calls `f` on every receiver, in order.
    pub(crate) fn dispatch_all(&mut self, mut f: impl FnMut(&mut dyn Receiver)) {
        for registration in &mut self.registrations {
            f(registration.receiver_mut());
        }
    }

    pub(crate) fn into_receivers(self) -> Vec<Box<dyn Receiver>> {
        self.registrations.into_iter().map(|r| r.receiver).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receiver_capabilities;
    use crate::traits::receiver::{FolderReceiver, ListReceiver, SiteReceiver};

    struct Lists(ReceiverOptions);

    impl ListReceiver for Lists {}

    impl Receiver for Lists {
        fn options(&self) -> ReceiverOptions {
            self.0
        }

        receiver_capabilities!(list);
    }

    struct Folders;

    impl FolderReceiver for Folders {}

    impl Receiver for Folders {
        receiver_capabilities!(folder);
    }

    struct RootSitesOnly;

    impl SiteReceiver for RootSitesOnly {}

    impl Receiver for RootSitesOnly {
        fn options(&self) -> ReceiverOptions {
            ReceiverOptions::new().with_sub_sites(false)
        }

        receiver_capabilities!(site);
    }

    struct Nothing;

    impl Receiver for Nothing {}

    #[test]
    fn test_active_at_is_exact_membership() {
        let registration = Registration::new(Box::new(Lists(ReceiverOptions::default())));
        assert!(registration.is_active_at(Level::List));
        assert!(!registration.is_active_at(Level::Site));
        assert!(!registration.is_active_at(Level::Folder));
    }

    #[test]
    fn test_active_at_or_below() {
        let registration = Registration::new(Box::new(Folders));
        assert!(registration.is_active_at_or_below(Level::Folder));
        assert!(registration.is_active_at_or_below(Level::List));
        assert!(registration.is_active_at_or_below(Level::SiteCollection));
        assert!(!registration.is_active_at_or_below(Level::ListItem));
        assert!(!registration.is_active_at_or_below(Level::TermStore));
    }

    #[test]
    fn test_empty_receiver_never_opens_a_gate() {
        let mut registry = Registry::new();
        registry.register(Box::new(Nothing));
        for level in Level::ALL {
            assert!(!registry.any_active_at_or_below(level));
        }
        assert!(!registry.is_axis_open(Axis::SiteCollections));
        assert!(registry.active_for(Level::Tenant, |_| true).is_empty());
    }

    #[test]
    fn test_sub_site_gate_needs_a_receiver_that_includes_sub_sites() {
        let mut registry = Registry::new();
        registry.register(Box::new(RootSitesOnly));
        assert!(registry.is_axis_open(Axis::RootSite));
        assert!(!registry.is_axis_open(Axis::SubSites));

        registry.register(Box::new(Folders));
        assert!(registry.is_axis_open(Axis::SubSites));
        assert!(registry.any_with_include_sub_sites());
    }

    #[test]
    fn test_active_for_preserves_order_and_applies_filter() {
        let mut registry = Registry::new();
        registry.register(Box::new(Lists(ReceiverOptions::default())));
        registry.register(Box::new(Folders));
        registry.register(Box::new(Lists(ReceiverOptions::new().with_hidden_lists(true))));

        assert_eq!(registry.active_for(Level::List, |_| true), vec![0, 2]);
        assert_eq!(
            registry.active_for(Level::List, |o| o.include_hidden_lists),
            vec![2]
        );
        assert!(registry.any_with_include_hidden_lists());
    }

    #[test]
    fn test_items_gate_opens_for_file_receivers_only_below_folder() {
        let mut registry = Registry::new();
        registry.register(Box::new(Folders));
        assert!(registry.is_axis_open(Axis::SubFolders));
        assert!(!registry.is_axis_open(Axis::Items));
        assert!(!registry.is_axis_open(Axis::Views));
    }
}
