use super::{AnyNode, Node, Visit};
use crate::error::StoreResult;
use crate::registry::Registry;
use crate::session::Session;
use crate::traits::receiver::Receiver;
use crate::traits::store::Axis;
use crate::types::config::ReceiverOptions;
use crate::types::entity::EntityRecord;
use crate::types::sites::{Folder, List, View};

impl Visit for List {
    const AXES: &'static [Axis] = &[Axis::Views, Axis::RootFolder];

    fn admits(&self, options: &ReceiverOptions) -> bool {
        !self.is_hidden() || options.include_hidden_lists
    }

    fn start(&self, receiver: &mut dyn Receiver) {
        if let Some(r) = receiver.as_list() {
            r.on_list_start(self);
        }
    }

    fn end(&self, receiver: &mut dyn Receiver) {
        if let Some(r) = receiver.as_list() {
            r.on_list_end(self);
        }
    }

    fn child(
        &self,
        axis: Axis,
        record: EntityRecord,
        session: &Session,
        _registry: &Registry,
    ) -> StoreResult<Option<AnyNode>> {
        Ok(Some(match axis {
            Axis::Views => Node::<View>::child(axis, record, session)?.into(),
            _ => Node::<Folder>::child(axis, record, session)?.into(),
        }))
    }
}

impl Visit for View {
    fn start(&self, receiver: &mut dyn Receiver) {
        if let Some(r) = receiver.as_view() {
            r.on_view(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::entity::{Element, Fields};

    #[test]
    fn test_hidden_lists_admit_only_receivers_that_include_them() {
        let hidden = List::from_parts("catalog".into(), Fields::new().with("Hidden", true));
        assert!(!hidden.admits(&ReceiverOptions::default()));
        assert!(hidden.admits(&ReceiverOptions::new().with_hidden_lists(true)));
        assert!(List::new("docs").admits(&ReceiverOptions::default()));
    }

    #[test]
    fn test_views_are_leaves() {
        assert!(View::is_leaf());
        assert!(!List::is_leaf());
    }
}
