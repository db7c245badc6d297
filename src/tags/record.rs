//! TagRecord: one (category, subcategory, citation key) fact.

use smallvec::SmallVec;

use crate::model::Item;
use crate::normalize::NormalizedItem;
use super::SubcategoryMap;

/// A derived fact, not an entity: identical records are interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagRecord {
    pub category: String,
    pub subcategory: String,
    /// `"Author (Year)"`.
    pub key: String,
}

impl TagRecord {
    /// Split a `#Category/Subcategory` tag. `None` for tags without `#`.
    pub fn parse(tag: &str, key: String) -> Option<Self> {
        let body = tag.strip_prefix('#')?;
        let parts: SmallVec<[&str; 3]> = body.split('/').collect();
        Some(Self {
            category: parts.first().copied().unwrap_or_default().trim().to_string(),
            subcategory: parts.get(1).copied().unwrap_or_default().trim().to_string(),
            key,
        })
    }

    pub fn new(category: impl Into<String>, subcategory: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            subcategory: subcategory.into(),
            key: key.into(),
        }
    }
}

/// Records for every `#` tag of every item, subcategories normalized.
pub fn records_for<'a, I>(items: I, mapping: &SubcategoryMap) -> Vec<TagRecord>
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut records = Vec::new();
    for item in items {
        let normalized = NormalizedItem::from_item(item);
        let key = normalized.citation_key();
        for tag in &normalized.tags {
            if let Some(mut record) = TagRecord::parse(tag, key.clone()) {
                record.subcategory = mapping.normalize(&record.subcategory);
                records.push(record);
            }
        }
    }
    records
}
