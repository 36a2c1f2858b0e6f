use super::{AnyNode, Node, Visit};
use crate::error::StoreResult;
use crate::registry::Registry;
use crate::session::Session;
use crate::traits::receiver::Receiver;
use crate::traits::store::Axis;
use crate::types::entity::EntityRecord;
use crate::types::taxonomy::{Term, TermGroup, TermSet, TermStore};

impl Visit for TermStore {
    const AXES: &'static [Axis] = &[Axis::TermGroups];

    fn start(&self, receiver: &mut dyn Receiver) {
        if let Some(r) = receiver.as_term_store() {
            r.on_term_store_start(self);
        }
    }

    fn end(&self, receiver: &mut dyn Receiver) {
        if let Some(r) = receiver.as_term_store() {
            r.on_term_store_end(self);
        }
    }

    fn child(
        &self,
        axis: Axis,
        record: EntityRecord,
        session: &Session,
        _registry: &Registry,
    ) -> StoreResult<Option<AnyNode>> {
        Ok(Some(Node::<TermGroup>::child(axis, record, session)?.into()))
    }
}

impl Visit for TermGroup {
    const AXES: &'static [Axis] = &[Axis::TermSets];

    fn start(&self, receiver: &mut dyn Receiver) {
        if let Some(r) = receiver.as_term_group() {
            r.on_term_group_start(self);
        }
    }

    fn end(&self, receiver: &mut dyn Receiver) {
        if let Some(r) = receiver.as_term_group() {
            r.on_term_group_end(self);
        }
    }

    fn child(
        &self,
        axis: Axis,
        record: EntityRecord,
        session: &Session,
        _registry: &Registry,
    ) -> StoreResult<Option<AnyNode>> {
        Ok(Some(Node::<TermSet>::child(axis, record, session)?.into()))
    }
}

impl Visit for TermSet {
    const AXES: &'static [Axis] = &[Axis::Terms];

    fn start(&self, receiver: &mut dyn Receiver) {
        if let Some(r) = receiver.as_term_set() {
            r.on_term_set_start(self);
        }
    }

    fn end(&self, receiver: &mut dyn Receiver) {
        if let Some(r) = receiver.as_term_set() {
            r.on_term_set_end(self);
        }
    }

    fn child(
        &self,
        axis: Axis,
        record: EntityRecord,
        session: &Session,
        _registry: &Registry,
    ) -> StoreResult<Option<AnyNode>> {
        Ok(Some(Node::<Term>::child(axis, record, session)?.into()))
    }
}

// Child terms sit between start and end, so terms have no end-after event.
impl Visit for Term {
    const AXES: &'static [Axis] = &[Axis::ChildTerms];

    fn start(&self, receiver: &mut dyn Receiver) {
        if let Some(r) = receiver.as_term() {
            r.on_term_start(self);
        }
    }

    fn end(&self, receiver: &mut dyn Receiver) {
        if let Some(r) = receiver.as_term() {
            r.on_term_end(self);
        }
    }

    fn child(
        &self,
        axis: Axis,
        record: EntityRecord,
        session: &Session,
        _registry: &Registry,
    ) -> StoreResult<Option<AnyNode>> {
        Ok(Some(Node::<Term>::child(axis, record, session)?.into()))
    }
}
