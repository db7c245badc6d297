//! Cross-tabulations of tag records.
//!
//! Both tables keep their keys in sorted sets, so rendering the same
//! records always produces the same bytes.

use std::collections::{BTreeMap, BTreeSet};

use hashbrown::HashSet;

use super::TagRecord;

/// Joins the citation keys of one cell.
pub const CELL_SEPARATOR: &str = "<br>";

/// `(category, subcategory)`.
pub type RowKey = (String, String);

fn join_cell(keys: &BTreeSet<String>) -> String {
    keys.iter().map(String::as_str).collect::<Vec<_>>().join(CELL_SEPARATOR)
}

// ============================================================================
// TagTable
// ============================================================================

/// `(category, subcategory) → {citation keys}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagTable {
    rows: BTreeMap<RowKey, BTreeSet<String>>,
}

impl TagTable {
    pub fn aggregate<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a TagRecord>,
    {
        let mut rows: BTreeMap<RowKey, BTreeSet<String>> = BTreeMap::new();
        for record in records {
            rows.entry((record.category.clone(), record.subcategory.clone()))
                .or_default()
                .insert(record.key.clone());
        }
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn keys(&self, category: &str, subcategory: &str) -> Option<&BTreeSet<String>> {
        self.rows.get(&(category.to_string(), subcategory.to_string()))
    }

    /// Keys joined with `CELL_SEPARATOR`, unescaped; empty if the row does not exist.
    pub fn cell(&self, category: &str, subcategory: &str) -> String {
        self.keys(category, subcategory).map(join_cell).unwrap_or_default()
    }

    /// Rows in (category, subcategory) order with their keys.
    pub fn rows(&self) -> impl Iterator<Item = (&RowKey, &BTreeSet<String>)> {
        self.rows.iter()
    }
}

// ============================================================================
// ScenarioTable
// ============================================================================

/// The tag table split into one column per scenario.
///
/// Column `s` of row `(c, sub)` lists the citation keys that carry both the
/// scenario tag `s` and the tag `c/sub`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioTable {
    scenarios: Vec<String>,
    rows: BTreeMap<RowKey, Vec<BTreeSet<String>>>,
}

impl ScenarioTable {
    pub fn pivot(records: &[TagRecord], scenario_category: &str) -> Self {
        let scenarios: Vec<String> = records
            .iter()
            .filter(|r| r.category == scenario_category)
            .map(|r| r.subcategory.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut rows: BTreeMap<RowKey, Vec<BTreeSet<String>>> = BTreeMap::new();
        for (column, scenario) in scenarios.iter().enumerate() {
            let members: HashSet<&str> = records
                .iter()
                .filter(|r| r.category == scenario_category && &r.subcategory == scenario)
                .map(|r| r.key.as_str())
                .collect();

            for record in records.iter().filter(|r| members.contains(r.key.as_str())) {
                let cells = rows
                    .entry((record.category.clone(), record.subcategory.clone()))
                    .or_insert_with(|| vec![BTreeSet::new(); scenarios.len()]);
                cells[column].insert(record.key.clone());
            }
        }

        Self { scenarios, rows }
    }

    /// Column labels, sorted.
    pub fn scenarios(&self) -> &[String] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One joined cell per scenario; `""` where nothing matches.
    pub fn cells(&self, category: &str, subcategory: &str) -> Option<Vec<String>> {
        self.rows
            .get(&(category.to_string(), subcategory.to_string()))
            .map(|cells| cells.iter().map(join_cell).collect())
    }

    /// Rows in (category, subcategory) order, one key set per scenario.
    pub fn rows(&self) -> impl Iterator<Item = (&RowKey, &[BTreeSet<String>])> {
        self.rows.iter().map(|(row, cells)| (row, cells.as_slice()))
    }
}
