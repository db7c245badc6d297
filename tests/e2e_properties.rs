//! Property tests: period validity and collection-order independence.

use bibtags::model::Collection;
use bibtags::period::{is_valid, parse_period, MAX_SPAN_YEARS, MIN_SPAN_YEARS};
use bibtags::CollectionTree;
use proptest::prelude::*;

fn three_levels() -> Vec<Collection> {
    vec![
        Collection::new("ROOT", "3_Variables"),
        Collection::new("T", "1_Temperature").with_parent("ROOT"),
        Collection::new("P", "2_Precipitation").with_parent("ROOT"),
        Collection::new("H", "Heat waves").with_parent("T"),
        Collection::new("C", "Cold spells").with_parent("T"),
        Collection::new("X", "Unrelated"),
    ]
}

proptest! {
    #[test]
    fn prop_validity_is_span_window(start in 1000i32..3000, len in 1i32..100) {
        let end = start + len - 1;
        let text = format!("{start}-{end}");
        prop_assert_eq!(is_valid(&text), (MIN_SPAN_YEARS..=MAX_SPAN_YEARS).contains(&len));
    }

    #[test]
    fn prop_parse_never_panics(input in ".{0,12}") {
        let _ = parse_period(&input);
        let _ = is_valid(&input);
    }

    #[test]
    fn prop_single_year_covers_whole_year(year in 1000i32..3000) {
        let (start, end) = parse_period(&year.to_string()).unwrap();
        prop_assert_eq!(start.to_string(), format!("{year}-01-01"));
        prop_assert_eq!(end.to_string(), format!("{year}-12-31"));
    }

    #[test]
    fn prop_tree_walk_ignores_input_order(collections in Just(three_levels()).prop_shuffle()) {
        let tree = CollectionTree::new(&collections).unwrap();

        let descendants = tree.descendants("ROOT");
        prop_assert_eq!(descendants.len(), 5);
        prop_assert!(!descendants.contains("X"));

        let walk: Vec<String> = tree.walk("ROOT").into_iter().map(|e| e.key).collect();
        prop_assert_eq!(walk, vec!["ROOT", "T", "C", "H", "P"]);
    }
}
