use super::{AnyNode, Node, Visit};
use crate::error::StoreResult;
use crate::registry::Registry;
use crate::session::Session;
use crate::traits::receiver::Receiver;
use crate::traits::store::Axis;
use crate::types::config::ReceiverOptions;
use crate::types::entity::{Element, EntityRecord};
use crate::types::sites::{List, Site, SiteCollection};

impl Visit for SiteCollection {
    const AXES: &'static [Axis] = &[Axis::RootSite];

    fn start(&self, receiver: &mut dyn Receiver) {
        if let Some(r) = receiver.as_site_collection() {
            r.on_site_collection_start(self);
        }
    }

    fn end(&self, receiver: &mut dyn Receiver) {
        if let Some(r) = receiver.as_site_collection() {
            r.on_site_collection_end(self);
        }
    }

    fn child(
        &self,
        axis: Axis,
        record: EntityRecord,
        session: &Session,
        _registry: &Registry,
    ) -> StoreResult<Option<AnyNode>> {
        Ok(Some(Node::<Site>::child(axis, record, session)?.into()))
    }
}

impl Visit for Site {
    const AXES: &'static [Axis] = &[Axis::Lists];
    const NESTED: Option<Axis> = Some(Axis::SubSites);

    fn admits(&self, options: &ReceiverOptions) -> bool {
        !self.is_sub_site() || options.include_sub_sites
    }

    fn start(&self, receiver: &mut dyn Receiver) {
        if let Some(r) = receiver.as_site() {
            r.on_site_start(self);
        }
    }

    fn end(&self, receiver: &mut dyn Receiver) {
        if let Some(r) = receiver.as_site() {
            r.on_site_end(self);
        }
    }

    fn end_after_nested(&self, receiver: &mut dyn Receiver) {
        if let Some(r) = receiver.as_site() {
            r.on_site_end_after_sub_sites(self);
        }
    }

    fn child(
        &self,
        axis: Axis,
        record: EntityRecord,
        session: &Session,
        registry: &Registry,
    ) -> StoreResult<Option<AnyNode>> {
        match axis {
            Axis::SubSites => {
                let site = Site::from_record(axis, record)?.into_sub_site();
                Ok(Some(Node::new(site, session.clone()).into()))
            }
            _ => {
                let list = List::from_record(axis, record)?;
                if list.is_hidden() && !registry.any_with_include_hidden_lists() {
                    tracing::debug!(list = %list.key(), "Skipping hidden list");
                    return Ok(None);
                }
                Ok(Some(Node::new(list, session.clone()).into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_sites_admit_only_receivers_that_include_them() {
        let root = Site::new("root");
        let sub = Site::new("sub").into_sub_site();
        let excluding = ReceiverOptions::new().with_sub_sites(false);

        assert!(root.admits(&excluding));
        assert!(!sub.admits(&excluding));
        assert!(sub.admits(&ReceiverOptions::default()));
    }
}
