//! Collection tree: parent/child index over the flat collection list.
//!
//! The API hands out collections as a flat list with parent pointers.
//! `CollectionTree` indexes that list once per run and answers the two
//! questions the reports ask: "which collections sit under this one" and
//! "what is this collection called".

use std::collections::BTreeSet;

use hashbrown::{HashMap, HashSet};

use crate::model::Collection;
use crate::{Error, Result};

/// One node visited by [`CollectionTree::walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub key: String,
    /// 0 for the starting collection.
    pub depth: usize,
    /// Names from the starting collection down, joined with `/`.
    pub path: String,
}

#[derive(Debug, Clone, Default)]
pub struct CollectionTree {
    names: HashMap<String, String>,
    children: HashMap<String, Vec<String>>,
}

impl CollectionTree {
    /// Index a flat collection list. Keys must be unique.
    pub fn new(collections: &[Collection]) -> Result<Self> {
        let mut names = HashMap::with_capacity(collections.len());
        let mut children: HashMap<String, Vec<String>> = HashMap::new();

        for collection in collections {
            if names.insert(collection.key.clone(), collection.name().to_string()).is_some() {
                return Err(Error::ConstraintViolation(format!(
                    "duplicate collection key {}",
                    collection.key
                )));
            }
            if let Some(parent) = collection.parent() {
                children.entry(parent.to_string()).or_default().push(collection.key.clone());
            }
        }

        // Sibling order: by name, then key.
        for siblings in children.values_mut() {
            siblings.sort_by(|a, b| names[a.as_str()].cmp(&names[b.as_str()]).then_with(|| a.cmp(b)));
        }

        Ok(Self { names, children })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.names.contains_key(key)
    }

    pub fn name(&self, key: &str) -> Option<&str> {
        self.names.get(key).map(String::as_str)
    }

    /// Direct children, ordered by name.
    pub fn children(&self, key: &str) -> &[String] {
        self.children.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Key of the collection called `name`. With several matches the
    /// smallest key wins.
    pub fn find_by_name(&self, name: &str) -> Option<&str> {
        self.names
            .iter()
            .filter(|(_, n)| n.as_str() == name)
            .map(|(k, _)| k.as_str())
            .min()
    }

    /// `key` plus every collection below it, at any depth.
    ///
    /// `key` itself is always included, known or not. Each collection is
    /// visited at most once, so a cyclic parent chain terminates.
    pub fn descendants(&self, key: &str) -> HashSet<String> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut stack = vec![key.to_string()];
        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            for child in self.children(&current) {
                if !seen.contains(child) {
                    stack.push(child.clone());
                }
            }
        }
        seen
    }

    /// Depth-first, pre-order walk from `key`, children by name.
    pub fn walk(&self, key: &str) -> Vec<WalkEntry> {
        let root_name = self.name(key).unwrap_or(key).to_string();
        let mut out = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        // Reversed pushes keep siblings in name order when popped.
        let mut stack: Vec<(&str, usize, String)> = vec![(key, 0, root_name)];
        while let Some((current, depth, path)) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            for child in self.children(current).iter().rev() {
                let name = self.name(child).unwrap_or(child);
                stack.push((child.as_str(), depth + 1, format!("{path}/{name}")));
            }
            out.push(WalkEntry { key: current.to_string(), depth, path });
        }
        out
    }

    /// Names of the given collection keys, sorted and deduplicated.
    /// Unknown keys are skipped.
    pub fn names_for<'a, I>(&self, keys: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        keys.into_iter()
            .filter_map(|k| self.name(k))
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn three_levels() -> Vec<Collection> {
        vec![
            Collection::new("ROOT", "Variables"),
            Collection::new("T", "Temperature").with_parent("ROOT"),
            Collection::new("P", "Precipitation").with_parent("ROOT"),
            Collection::new("T1", "Extremes").with_parent("T"),
            Collection::new("P1", "Drought").with_parent("P"),
            Collection::new("OTHER", "Regions"),
        ]
    }

    fn sorted(set: HashSet<String>) -> Vec<String> {
        let mut v: Vec<String> = set.into_iter().collect();
        v.sort();
        v
    }

    #[test]
    fn test_descendants_include_self() {
        let tree = CollectionTree::new(&three_levels()).unwrap();
        assert_eq!(sorted(tree.descendants("ROOT")), vec!["P", "P1", "ROOT", "T", "T1"]);
        assert_eq!(sorted(tree.descendants("T")), vec!["T", "T1"]);
        assert_eq!(sorted(tree.descendants("T1")), vec!["T1"]);
    }

    #[test]
    fn test_unknown_key_yields_itself() {
        let tree = CollectionTree::new(&three_levels()).unwrap();
        assert_eq!(sorted(tree.descendants("NOPE")), vec!["NOPE"]);
    }

    #[test]
    fn test_cycle_terminates() {
        let cyclic = vec![
            Collection::new("A", "a").with_parent("B"),
            Collection::new("B", "b").with_parent("A"),
        ];
        let tree = CollectionTree::new(&cyclic).unwrap();
        assert_eq!(sorted(tree.descendants("A")), vec!["A", "B"]);
        assert_eq!(tree.walk("A").len(), 2);
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let dup = vec![Collection::new("A", "a"), Collection::new("A", "again")];
        assert!(matches!(CollectionTree::new(&dup), Err(Error::ConstraintViolation(_))));
    }

    #[test]
    fn test_walk_order_and_paths() {
        let tree = CollectionTree::new(&three_levels()).unwrap();
        let paths: Vec<(usize, String)> = tree.walk("ROOT").into_iter().map(|e| (e.depth, e.path)).collect();
        assert_eq!(
            paths,
            vec![
                (0, "Variables".to_string()),
                (1, "Variables/Precipitation".to_string()),
                (2, "Variables/Precipitation/Drought".to_string()),
                (1, "Variables/Temperature".to_string()),
                (2, "Variables/Temperature/Extremes".to_string()),
            ]
        );
    }

    #[test]
    fn test_names_for() {
        let tree = CollectionTree::new(&three_levels()).unwrap();
        let keys = vec!["T".to_string(), "MISSING".to_string(), "P".to_string(), "T".to_string()];
        assert_eq!(tree.names_for(&keys), vec!["Precipitation", "Temperature"]);
    }

    #[test]
    fn test_find_by_name() {
        let tree = CollectionTree::new(&three_levels()).unwrap();
        assert_eq!(tree.find_by_name("Temperature"), Some("T"));
        assert_eq!(tree.find_by_name("Wind"), None);
    }
}
