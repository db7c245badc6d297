//! Dump → reload round trips through the interchange format and the sources.

use bibtags::pipeline::snapshot_file_name;
use bibtags::source::CachedSource;
use bibtags::{DumpSource, Library, LibrarySource, MemorySource, NormalizedItem};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;

const FIXTURE: &str = include_str!("fixtures/library.json");

fn normalize_all(library: &Library) -> Vec<NormalizedItem> {
    library.items.iter().map(NormalizedItem::from_item).collect()
}

#[test]
fn test_snapshot_reload_yields_identical_normalizations() {
    let library = Library::from_json_str(FIXTURE).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let at = NaiveDate::from_ymd_opt(2024, 4, 9).unwrap().and_hms_opt(17, 45, 0).unwrap();
    let name = snapshot_file_name(library.name().unwrap(), at);
    assert_eq!(name, "CLIVAR Chapter 5_20240409_1745.json");

    let path = dir.path().join(&name);
    library.save(&path).unwrap();
    let reloaded = DumpSource::new(&path).fetch().unwrap();

    assert_eq!(reloaded, library);
    assert_eq!(normalize_all(&reloaded), normalize_all(&library));
}

#[test]
fn test_unknown_fields_survive() {
    let library = Library::from_json_str(FIXTURE).unwrap();
    let mut out = Vec::new();
    library.write_pretty(&mut out).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

    assert_eq!(json["items"][0]["version"], 412);
    assert_eq!(json["items"][0]["data"]["abstractNote"], "Observed and projected heat.");
    assert_eq!(json["items"][1]["meta"]["numChildren"], 0);
    assert_eq!(json["items"][0]["library"]["id"], 5149914);
    assert_eq!(json["items"][4]["data"]["creators"][0]["fieldMode"], 1);
    assert_eq!(json["collections"][0]["data"]["parentCollection"], false);
    assert_eq!(json["collections"][1]["data"]["parentCollection"], "VARS");
}

#[test]
fn test_item_without_data_is_rejected() {
    let err = Library::from_json_str(r#"{"items": [{"key": "X"}]}"#).unwrap_err();
    assert!(matches!(err, bibtags::Error::Json(_)));
}

#[test]
fn test_cached_source_writes_then_reuses_cache() {
    let library = Library::from_json_str(FIXTURE).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("cache.json");

    let first = CachedSource::new(MemorySource::new(library.clone()), &cache).fetch().unwrap();
    assert!(cache.exists());

    // An empty inner source proves the second read comes from disk.
    let second = CachedSource::new(MemorySource::new(Library::default()), &cache).fetch().unwrap();
    assert_eq!(first, library);
    assert_eq!(second, library);
}
