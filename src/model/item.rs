//! Bibliographic item (top-level record, child note, or attachment).

use serde::{Deserialize, Serialize};
use super::Extra;

/// One record of the library, as returned by `GET /items`.
///
/// `data` is required: a record without it is not an item and fails to
/// deserialize. Everything inside `data` is optional and defaults to empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<LibraryRef>,
    #[serde(default)]
    pub meta: ItemMeta,
    pub data: ItemData,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Owning library reference (`item.library`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryRef {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Server-computed summary fields (`item.meta`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemMeta {
    #[serde(rename = "creatorSummary", default, skip_serializing_if = "Option::is_none")]
    pub creator_summary: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Editable fields of an item (`item.data`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemData {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub item_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub creators: Vec<Creator>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub collections: Vec<String>,
    /// Present on child notes and attachments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_item: Option<String>,
    /// HTML body of a note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A creator: either a single-field `name` or a `firstName`/`lastName` pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    #[serde(default)]
    pub creator_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Creator {
    /// Single-field creator, e.g. `"Smith, J."` or an institution.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            creator_type: "author".into(),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn person(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            creator_type: "author".into(),
            first_name: Some(first.into()),
            last_name: Some(last.into()),
            ..Self::default()
        }
    }
}

/// A tag attached to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub tag: String,
    /// 0 = manual, 1 = automatic.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<u8>,
}

impl From<&str> for Tag {
    fn from(tag: &str) -> Self {
        Self { tag: tag.to_owned(), kind: None }
    }
}

impl Item {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            data: ItemData {
                key: key.clone(),
                item_type: "journalArticle".into(),
                ..ItemData::default()
            },
            key,
            library: None,
            meta: ItemMeta::default(),
            extra: Extra::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.data.title = title.into();
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.data.date = Some(date.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.data.url = Some(url.into());
        self
    }

    pub fn with_creator(mut self, creator: Creator) -> Self {
        self.data.creators.push(creator);
        self
    }

    pub fn with_creator_summary(mut self, summary: impl Into<String>) -> Self {
        self.meta.creator_summary = Some(summary.into());
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.data.tags.push(Tag::from(tag));
        self
    }

    pub fn in_collection(mut self, collection_key: impl Into<String>) -> Self {
        self.data.collections.push(collection_key.into());
        self
    }

    /// Turn this record into a child note of `parent`.
    pub fn note_of(mut self, parent: impl Into<String>, html: impl Into<String>) -> Self {
        self.data.item_type = "note".into();
        self.data.parent_item = Some(parent.into());
        self.data.note = Some(html.into());
        self
    }

    /// Top-level records have no parent; notes and attachments do.
    pub fn is_top_level(&self) -> bool {
        self.data.parent_item.is_none()
    }

    pub fn is_note(&self) -> bool {
        self.data.item_type == "note"
    }

    /// True if any of the item's collections satisfies `contains`.
    pub fn in_any<F>(&self, contains: F) -> bool
    where
        F: Fn(&str) -> bool,
    {
        self.data.collections.iter().any(|c| contains(c))
    }
}
