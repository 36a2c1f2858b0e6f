//! Tenant and site-collection branch entities.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::level::Level;
use crate::types::entity::{element, Element, EntityKey, Fields};

element!(
    /// The tenant: root of every crawl.
    Tenant,
    Level::Tenant,
    ["RootSiteUrl"]
);

element!(
    /// A site collection. Each one is crawled under its own session.
    SiteCollection,
    Level::SiteCollection,
    ["Url"]
);

element!(
    /// A list or document library.
    List,
    Level::List,
    ["Title", "Hidden", "ItemCount"]
);

element!(
    /// A list view.
    View,
    Level::View,
    ["Title", "ServerRelativeUrl"]
);

element!(
    /// A folder of a list.
    Folder,
    Level::Folder,
    ["Name", "ServerRelativeUrl", "ItemCount"]
);

element!(
    /// A list item that is not a file.
    ListItem,
    Level::ListItem,
    ["Id", "FileSystemObjectType", "FileRef"]
);

element!(
    /// A file, reached through the list item that carries it.
    File,
    Level::File,
    ["Name", "ServerRelativeUrl", "Length"]
);

impl Tenant {
    pub fn root_site_url(&self) -> Option<&str> {
        self.fields().str("RootSiteUrl")
    }
}

impl SiteCollection {
    pub fn url(&self) -> Option<&str> {
        self.fields().str("Url")
    }
}

/// A site (web). Tracks whether it was reached as a sub-site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    key: EntityKey,
    #[serde(default)]
    fields: Fields,
    #[serde(default)]
    sub_site: bool,
}

impl Site {
    pub fn new(key: impl Into<EntityKey>) -> Self {
        Self {
            key: key.into(),
            fields: Fields::new(),
            sub_site: false,
        }
    }

    pub(crate) fn into_sub_site(mut self) -> Self {
        self.sub_site = true;
        self
    }

    /// True when this site was reached through another site's sub-sites.
    pub fn is_sub_site(&self) -> bool {
        self.sub_site
    }

    pub fn title(&self) -> Option<&str> {
        self.fields.str("Title")
    }

    pub fn url(&self) -> Option<&str> {
        self.fields.str("Url")
    }
}

impl Element for Site {
    const LEVEL: Level = Level::Site;
    const FIELDS: &'static [&'static str] = &["Title", "Url", "Features"];

    fn from_parts(key: EntityKey, fields: Fields) -> Self {
        Self {
            key,
            fields,
            sub_site: false,
        }
    }

    fn key(&self) -> &EntityKey {
        &self.key
    }

    fn fields(&self) -> &Fields {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut Fields {
        &mut self.fields
    }
}

impl List {
    pub fn title(&self) -> Option<&str> {
        self.fields().str("Title")
    }

    /// Hidden lists are only dispatched to receivers that include them.
    pub fn is_hidden(&self) -> bool {
        self.fields().bool("Hidden").unwrap_or(false)
    }

    pub fn item_count(&self) -> Option<u64> {
        self.fields().u64("ItemCount")
    }
}

impl View {
    pub fn title(&self) -> Option<&str> {
        self.fields().str("Title")
    }
}

impl Folder {
    pub fn name(&self) -> Option<&str> {
        self.fields().str("Name")
    }

    pub fn server_relative_url(&self) -> Option<&str> {
        self.fields().str("ServerRelativeUrl")
    }
}

/// What a list item stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileSystemObjectType {
    File,
    Folder,
    Invalid,
}

impl FileSystemObjectType {
    pub const FIELD: &'static str = "FileSystemObjectType";

    /// Reads the `FileSystemObjectType` field, either by name (`"File"`,
    /// `"Folder"`) or in the numeric form (0 file, 1 folder). Anything else,
    /// including a missing field, is a plain list item.
    pub fn of(fields: &Fields) -> Self {
        match fields.get(Self::FIELD) {
            Some(Value::String(name)) => match name.as_str() {
                "File" => Self::File,
                "Folder" => Self::Folder,
                _ => Self::Invalid,
            },
            Some(Value::Number(n)) => match n.as_i64() {
                Some(0) => Self::File,
                Some(1) => Self::Folder,
                _ => Self::Invalid,
            },
            _ => Self::Invalid,
        }
    }
}

impl ListItem {
    pub fn file_system_object_type(&self) -> FileSystemObjectType {
        FileSystemObjectType::of(self.fields())
    }

    pub fn file_ref(&self) -> Option<&str> {
        self.fields().str("FileRef")
    }
}

impl File {
    pub fn name(&self) -> Option<&str> {
        self.fields().str("Name")
    }

    pub fn server_relative_url(&self) -> Option<&str> {
        self.fields().str("ServerRelativeUrl")
    }

    /// Size in bytes.
    pub fn length(&self) -> Option<u64> {
        self.fields().u64("Length")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_defaults_to_false() {
        let list = List::new("tasks");
        assert!(!list.is_hidden());

        let hidden = List::from_parts("catalog".into(), Fields::new().with("Hidden", true));
        assert!(hidden.is_hidden());
    }

    #[test]
    fn test_object_type() {
        let file = ListItem::from_parts(
            "item-1".into(),
            Fields::new().with("FileSystemObjectType", "File"),
        );
        assert_eq!(file.file_system_object_type(), FileSystemObjectType::File);
        assert_eq!(
            ListItem::new("item-2").file_system_object_type(),
            FileSystemObjectType::Invalid
        );
    }

    #[test]
    fn test_numeric_object_type() {
        let kind = |value: i64| {
            FileSystemObjectType::of(&Fields::new().with(FileSystemObjectType::FIELD, value))
        };
        assert_eq!(kind(0), FileSystemObjectType::File);
        assert_eq!(kind(1), FileSystemObjectType::Folder);
        assert_eq!(kind(-1), FileSystemObjectType::Invalid);
    }

    #[test]
    fn test_sub_site_flag() {
        let site = Site::new("web");
        assert!(!site.is_sub_site());
        assert!(site.into_sub_site().is_sub_site());
    }
}
