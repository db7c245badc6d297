//! Item normalizer: derived attributes of a bibliographic item.
//!
//! Everything here is a pure function of one `Item`. Missing fields
//! (creators, date, url) default to empty strings, never errors.

use std::cmp::Ordering;

use hashbrown::HashSet;

use crate::model::Item;

/// First author of an item.
///
/// Prefers the server-computed `meta.creatorSummary`. Otherwise scans the
/// creators in order and takes the first one with a `name` (the part before
/// the first comma) or a `lastName`. Empty when nothing matches.
pub fn first_author(item: &Item) -> String {
    if let Some(summary) = &item.meta.creator_summary {
        return summary.clone();
    }
    for creator in &item.data.creators {
        if let Some(name) = creator.name.as_deref().filter(|n| !n.is_empty()) {
            return name.split(',').next().unwrap_or_default().to_string();
        }
        if let Some(last) = creator.last_name.as_deref().filter(|n| !n.is_empty()) {
            return last.to_string();
        }
    }
    String::new()
}

/// First four characters of `data.date`, or empty.
pub fn year(item: &Item) -> String {
    item.data
        .date
        .as_deref()
        .map(|d| d.chars().take(4).collect())
        .unwrap_or_default()
}

/// Tags starting with `#`, in item order.
pub fn hash_tags(item: &Item) -> Vec<String> {
    item.data
        .tags
        .iter()
        .filter(|t| t.tag.starts_with('#'))
        .map(|t| t.tag.clone())
        .collect()
}

/// `"Author (Year)"`, the key under which items appear in tag tables.
pub fn citation_key(author: &str, year: &str) -> String {
    format!("{author} ({year})")
}

/// An item reduced to the attributes the reports use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedItem {
    pub key: String,
    pub title: String,
    pub first_author: String,
    pub year: String,
    pub tags: Vec<String>,
    /// Collection keys, as stored on the item.
    pub collections: Vec<String>,
    pub url: Option<String>,
}

impl NormalizedItem {
    pub fn from_item(item: &Item) -> Self {
        Self {
            key: item.key.clone(),
            title: item.data.title.clone(),
            first_author: first_author(item),
            year: year(item),
            tags: hash_tags(item),
            collections: item.data.collections.clone(),
            url: item.data.url.clone().filter(|u| !u.is_empty()),
        }
    }

    pub fn citation_key(&self) -> String {
        citation_key(&self.first_author, &self.year)
    }

    /// Report order: lowercased author, then year. Title and key break ties
    /// so the order is total.
    pub fn report_order(&self, other: &Self) -> Ordering {
        self.first_author
            .to_lowercase()
            .cmp(&other.first_author.to_lowercase())
            .then_with(|| self.year.cmp(&other.year))
            .then_with(|| self.title.cmp(&other.title))
            .then_with(|| self.key.cmp(&other.key))
    }
}

/// Sort items into report order in place.
pub fn sort_for_report(items: &mut [NormalizedItem]) {
    items.sort_by(NormalizedItem::report_order);
}

/// Hands out display names that are unique within one run.
///
/// A name already handed out gets `suffix` appended until it is unused.
#[derive(Debug, Clone)]
pub struct UniqueNames {
    seen: HashSet<String>,
    suffix: char,
}

impl UniqueNames {
    pub const DEFAULT_SUFFIX: char = 'i';

    pub fn new() -> Self {
        Self::with_suffix(Self::DEFAULT_SUFFIX)
    }

    pub fn with_suffix(suffix: char) -> Self {
        Self { seen: HashSet::new(), suffix }
    }

    pub fn claim(&mut self, base: &str) -> String {
        let mut name = base.to_string();
        while self.seen.contains(&name) {
            name.push(self.suffix);
        }
        self.seen.insert(name.clone());
        name
    }
}

impl Default for UniqueNames {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Creator;

    #[test]
    fn test_creator_summary_wins() {
        let item = Item::new("A")
            .with_creator_summary("Gonzalez and Diaz")
            .with_creator(Creator::person("Ana", "Perez"));
        assert_eq!(first_author(&item), "Gonzalez and Diaz");
    }

    #[test]
    fn test_name_prefix_before_comma() {
        let item = Item::new("A").with_creator(Creator::named("Smith, John"));
        assert_eq!(first_author(&item), "Smith");
    }

    #[test]
    fn test_skips_creators_without_names() {
        let item = Item::new("A")
            .with_creator(Creator::default())
            .with_creator(Creator::person("Ana", "Perez"));
        assert_eq!(first_author(&item), "Perez");
    }

    #[test]
    fn test_no_creators_is_empty() {
        assert_eq!(first_author(&Item::new("A")), "");
    }

    #[test]
    fn test_year() {
        assert_eq!(year(&Item::new("A").with_date("2019-05-02")), "2019");
        assert_eq!(year(&Item::new("A").with_date("20")), "20");
        assert_eq!(year(&Item::new("A")), "");
    }

    #[test]
    fn test_hash_tags_filter() {
        let item = Item::new("A")
            .with_tag("#SCEN/rcp45")
            .with_tag("automatic")
            .with_tag("#VAR/tas");
        assert_eq!(hash_tags(&item), vec!["#SCEN/rcp45", "#VAR/tas"]);
    }

    #[test]
    fn test_report_order_empty_author_first() {
        let mut items = vec![
            NormalizedItem::from_item(&Item::new("B").with_creator(Creator::named("beta")).with_date("2001")),
            NormalizedItem::from_item(&Item::new("C").with_date("1999")),
            NormalizedItem::from_item(&Item::new("A").with_creator(Creator::named("Alpha")).with_date("2005")),
            NormalizedItem::from_item(&Item::new("D").with_creator(Creator::named("alpha")).with_date("2003")),
        ];
        sort_for_report(&mut items);
        let keys: Vec<&str> = items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["C", "D", "A", "B"]);
    }

    #[test]
    fn test_unique_names_append_suffix() {
        let mut names = UniqueNames::new();
        assert_eq!(names.claim("Smith, 2020"), "Smith, 2020");
        assert_eq!(names.claim("Smith, 2020"), "Smith, 2020i");
        assert_eq!(names.claim("Smith, 2020"), "Smith, 2020ii");
        assert_eq!(names.claim("Perez, 2020"), "Perez, 2020");
    }

    #[test]
    fn test_empty_url_is_none() {
        let item = NormalizedItem::from_item(&Item::new("A").with_url(""));
        assert_eq!(item.url, None);
    }
}
