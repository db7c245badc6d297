//! # Library Model
//!
//! DTOs for the Zotero web API shape: items, creators, tags, collections,
//! and the `{"items": [...], "collections": [...]}` interchange document.
//!
//! Design rule: pure data. No I/O beyond (de)serializing a `Library`,
//! no derived attributes (see `normalize`).

pub mod item;
pub mod collection;
pub mod library;

pub use item::{Creator, Item, ItemData, ItemMeta, LibraryRef, Tag};
pub use collection::{Collection, CollectionData};
pub use library::Library;

/// Unknown JSON fields, preserved verbatim on round-trip.
pub type Extra = serde_json::Map<String, serde_json::Value>;
