use super::{unexpected, AnyNode, Node, Visit};
use crate::error::StoreResult;
use crate::level::Level;
use crate::registry::Registry;
use crate::session::Session;
use crate::traits::receiver::Receiver;
use crate::traits::store::Axis;
use crate::types::entity::{Element, EntityRecord};
use crate::types::sites::{File, FileSystemObjectType, Folder, ListItem};

impl Visit for Folder {
    const AXES: &'static [Axis] = &[Axis::Items];
    const NESTED: Option<Axis> = Some(Axis::SubFolders);

    fn start(&self, receiver: &mut dyn Receiver) {
        if let Some(r) = receiver.as_folder() {
            r.on_folder_start(self);
        }
    }

    fn end(&self, receiver: &mut dyn Receiver) {
        if let Some(r) = receiver.as_folder() {
            r.on_folder_end(self);
        }
    }

    fn end_after_nested(&self, receiver: &mut dyn Receiver) {
        if let Some(r) = receiver.as_folder() {
            r.on_folder_end_after_sub_folders(self);
        }
    }

    fn routing_fields(axis: Axis) -> &'static [&'static str] {
        match axis {
            Axis::Items => &[FileSystemObjectType::FIELD],
            _ => &[],
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
            Axis::SubFolders => Ok(Some(Node::<Folder>::child(axis, record, session)?.into())),
            _ => route_item(record, session, registry),
        }
    }
}

/// Files are processed as [`File`] under the item's key. Folder items are
/// left to the sub-folder axis. Either kind is skipped when nobody would
/// receive it.
fn route_item(
    record: EntityRecord,
    session: &Session,
    registry: &Registry,
) -> StoreResult<Option<AnyNode>> {
    if record.level != Level::ListItem {
        return Err(unexpected(Axis::Items, record, Level::ListItem));
    }

    let node = match FileSystemObjectType::of(&record.fields) {
        FileSystemObjectType::Folder => None,
        FileSystemObjectType::File if registry.any_active_at_or_below(Level::File) => {
            let file = File::from_parts(record.key, record.fields);
            Some(Node::new(file, session.clone()).into())
        }
        FileSystemObjectType::Invalid if registry.any_active_at_or_below(Level::ListItem) => {
            let item = ListItem::from_parts(record.key, record.fields);
            Some(Node::new(item, session.clone()).into())
        }
        _ => None,
    };
    Ok(node)
}

impl Visit for ListItem {
    fn start(&self, receiver: &mut dyn Receiver) {
        if let Some(r) = receiver.as_list_item() {
            r.on_list_item(self);
        }
    }
}

impl Visit for File {
    fn start(&self, receiver: &mut dyn Receiver) {
        if let Some(r) = receiver.as_file() {
            r.on_file(self);
        }
    }
}
