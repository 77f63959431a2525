// tests/cache_store.rs
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use diag_tables::core::{DiagnosticKind, Diagnostics};
use diag_tables::mapping::MappingIndex;
use diag_tables::store::CacheStore;

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("diag_tables_cache_{}", name));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

const DAY: Duration = Duration::from_secs(24 * 3600);

fn sample_index() -> MappingIndex {
    let mut idx = MappingIndex::new();
    idx.insert("Microsoft.KeyVault/vaults", ["KeyVaultLogs", "AzureDiagnostics"]);
    idx.insert("Microsoft.Storage/storageAccounts", ["StorageBlobLogs"]);
    idx
}

#[test]
fn save_then_load() {
    let dir = tmp_dir("roundtrip");
    let store = CacheStore::new(dir.join("nested").join("table_map.json"), DAY);
    store.save(&sample_index()).unwrap();

    let mut diags = Diagnostics::new();
    let loaded = store.load(false, &mut diags).unwrap();
    assert_eq!(loaded, sample_index());
    assert!(diags.is_empty());

    // Artifact is a plain ResourceType → [TableName] object.
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(v["Microsoft.KeyVault/vaults"][0], "AzureDiagnostics");
}

#[test]
fn missing_file_is_a_quiet_miss() {
    let dir = tmp_dir("missing");
    let store = CacheStore::new(dir.join("table_map.json"), DAY);
    let mut diags = Diagnostics::new();
    assert!(store.load(false, &mut diags).is_none());
    assert!(diags.is_empty());
}

#[test]
fn zero_ttl_is_always_stale() {
    let dir = tmp_dir("stale");
    let store = CacheStore::new(dir.join("table_map.json"), Duration::ZERO);
    store.save(&sample_index()).unwrap();
    assert!(store.load(false, &mut Diagnostics::new()).is_none());
}

#[test]
fn force_refresh_bypasses_fresh_cache() {
    let dir = tmp_dir("force");
    let store = CacheStore::new(dir.join("table_map.json"), DAY);
    store.save(&sample_index()).unwrap();
    assert!(store.load(true, &mut Diagnostics::new()).is_none());
    assert!(store.load(false, &mut Diagnostics::new()).is_some());
}

#[test]
fn corrupt_names_are_stripped_on_load() {
    let dir = tmp_dir("revalidate");
    let path = dir.join("table_map.json");
    fs::write(&path, r#"{"Microsoft.X/y": ["AB", "ValidTableName"]}"#).unwrap();

    let mut diags = Diagnostics::new();
    let idx = CacheStore::new(&path, DAY).load(false, &mut diags).unwrap();
    let tables: Vec<_> = idx.get("Microsoft.X/y").unwrap().iter().cloned().collect();
    assert_eq!(tables, ["ValidTableName"]);
    assert_eq!(diags.count(DiagnosticKind::Validation), 1);
}

#[test]
fn unusable_cache_is_a_miss_with_diagnostic() {
    let dir = tmp_dir("unusable");
    let bad = dir.join("bad.json");
    fs::write(&bad, "{ truncated").unwrap();
    let mut diags = Diagnostics::new();
    assert!(CacheStore::new(&bad, DAY).load(false, &mut diags).is_none());
    assert_eq!(diags.count(DiagnosticKind::Cache), 1);

    let hollow = dir.join("hollow.json");
    fs::write(&hollow, r#"{"Microsoft.X/y": ["12345", "A"]}"#).unwrap();
    let mut diags = Diagnostics::new();
    assert!(CacheStore::new(&hollow, DAY).load(false, &mut diags).is_none());
    assert_eq!(diags.count(DiagnosticKind::Cache), 1);
    assert_eq!(diags.count(DiagnosticKind::Validation), 2);
}
