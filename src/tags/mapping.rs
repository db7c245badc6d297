//! Subcategory normalization: synonyms and period ranges → canonical buckets.

use std::collections::BTreeMap;

/// Built-in buckets. Scenario synonyms pair the RCP and SSP names of one
/// forcing level; period ranges fold into near/mid/far future.
const DEFAULT_BUCKETS: &[(&str, &str)] = &[
    ("rcp26", "rcp26/ssp126"),
    ("ssp126", "rcp26/ssp126"),
    ("rcp45", "rcp45/ssp245"),
    ("ssp245", "rcp45/ssp245"),
    ("rcp85", "rcp85/ssp585"),
    ("ssp585", "rcp85/ssp585"),
    ("2006-2040", "near future"),
    ("2011-2040", "near future"),
    ("2015-2040", "near future"),
    ("2021-2040", "near future"),
    ("2021-2050", "near future"),
    ("2023-2037", "near future"),
    ("2030-2059", "mid future"),
    ("2031-2060", "mid future"),
    ("2031-2065", "mid future"),
    ("2041-2060", "mid future"),
    ("2041-2070", "mid future"),
    ("2041-2080", "mid future"),
    ("2043-2057", "mid future"),
    ("2046-2065", "mid future"),
    ("2063-2077", "mid future"),
    ("2066-2100", "far future"),
    ("2070-2099", "far future"),
    ("2071-2100", "far future"),
    ("2080-2099", "far future"),
    ("2081-2100", "far future"),
    ("2083-2097", "far future"),
];

/// Fixed lookup table; unmapped subcategories pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubcategoryMap {
    table: BTreeMap<String, String>,
}

impl SubcategoryMap {
    /// A map with no entries (identity).
    pub fn empty() -> Self {
        Self { table: BTreeMap::new() }
    }

    /// Add or replace entries.
    pub fn with_overrides<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.table
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn normalize(&self, subcategory: &str) -> String {
        self.table
            .get(subcategory)
            .cloned()
            .unwrap_or_else(|| subcategory.to_string())
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for SubcategoryMap {
    fn default() -> Self {
        Self::empty().with_overrides(DEFAULT_BUCKETS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_synonyms() {
        let map = SubcategoryMap::default();
        assert_eq!(map.normalize("rcp45"), "rcp45/ssp245");
        assert_eq!(map.normalize("ssp245"), "rcp45/ssp245");
        assert_eq!(map.normalize("ssp585"), "rcp85/ssp585");
    }

    #[test]
    fn test_period_buckets() {
        let map = SubcategoryMap::default();
        assert_eq!(map.normalize("2021-2050"), "near future");
        assert_eq!(map.normalize("2041-2060"), "mid future");
        assert_eq!(map.normalize("2071-2100"), "far future");
    }

    #[test]
    fn test_unmapped_passes_through() {
        assert_eq!(SubcategoryMap::default().normalize("tasmax"), "tasmax");
        assert_eq!(SubcategoryMap::default().normalize(""), "");
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let map = SubcategoryMap::default().with_overrides([("rcp45", "intermediate"), ("ssp370", "rcp70/ssp370")]);
        assert_eq!(map.normalize("rcp45"), "intermediate");
        assert_eq!(map.normalize("ssp370"), "rcp70/ssp370");
    }
}
