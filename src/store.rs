// src/store.rs
//
// Local persistence under `.store/`:
// - the table-map cache (ResourceType → [TableName]), TTL'd on file mtime;
// - the ordered documentation-structure artifact.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde::Serialize;

use crate::core::{DiagnosticKind, Diagnostics};
use crate::error::{Error, Result};
use crate::file::ensure_parent;
use crate::mapping::MappingIndex;
use crate::model::{DocTree, TableRef};

pub struct CacheStore {
    path: PathBuf,
    ttl: Duration,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self { path: path.into(), ttl }
    }

    pub fn path(&self) -> &Path { &self.path }

    /// Cached index if present, fresh and readable; `None` means "fetch again".
    /// Every table name is re-validated; types left empty are dropped.
    pub fn load(&self, force_refresh: bool, diags: &mut Diagnostics) -> Option<MappingIndex> {
        if force_refresh {
            logf!("Cache bypassed (forced refresh)");
            return None;
        }
        let modified = fs::metadata(&self.path).and_then(|m| m.modified()).ok()?;
        let age = SystemTime::now().duration_since(modified).unwrap_or(Duration::ZERO);
        if age >= self.ttl {
            logf!(
                "Cache {} is stale (written {}, ttl {}h)",
                self.path.display(),
                DateTime::<Local>::from(modified).format("%Y-%m-%d %H:%M:%S"),
                self.ttl.as_secs() / 3600
            );
            return None;
        }

        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) => {
                diags.push(DiagnosticKind::Cache, format!("{}: unreadable ({e}), refetching", self.path.display()));
                return None;
            }
        };
        match parse_cache(&text, diags) {
            Some(index) if !index.is_empty() => {
                logf!("Loaded {} resource types from cache {}", index.len(), self.path.display());
                Some(index)
            }
            Some(_) => {
                diags.push(DiagnosticKind::Cache, format!("{}: no valid entries, refetching", self.path.display()));
                None
            }
            None => {
                diags.push(DiagnosticKind::Cache, format!("{}: malformed, refetching", self.path.display()));
                None
            }
        }
    }

    pub fn save(&self, index: &MappingIndex) -> Result<()> {
        ensure_parent(&self.path)?;
        let json = serde_json::to_string_pretty(index).map_err(|e| Error::json(&self.path, e))?;
        fs::write(&self.path, json).map_err(|e| Error::io(&self.path, e))?;
        logf!("Cached {} resource types to {}", index.len(), self.path.display());
        Ok(())
    }
}

/// Cache artifact → validated index. `None` only when the JSON itself is bad.
pub fn parse_cache(text: &str, diags: &mut Diagnostics) -> Option<MappingIndex> {
    let raw: BTreeMap<String, Vec<String>> = match serde_json::from_str(text) {
        Ok(r) => r,
        Err(e) => {
            logw!("Cache parse error: {e}");
            return None;
        }
    };
    let mut index = MappingIndex::new();
    for (rt, tables) in raw {
        index.insert(&rt, tables);
    }
    index.retain_valid("cache", diags);
    Some(index)
}

/* ---------------- Structure artifact ---------------- */

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct StructureArtifact<'a> {
    generated_date: String,
    source_url: &'a str,
    documentation_order_preserved: bool,
    categories: IndexMap<&'a str, IndexMap<&'a str, ProviderEntry<'a>>>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ProviderEntry<'a> {
    resource_type: &'a str,
    tables: &'a [TableRef],
}

pub fn structure_json(tree: &DocTree) -> Result<String> {
    let categories: IndexMap<&str, IndexMap<&str, ProviderEntry<'_>>> = tree
        .iter()
        .map(|c| {
            let providers: IndexMap<&str, ProviderEntry<'_>> = c
                .providers
                .values()
                .map(|p| (p.name.as_str(), ProviderEntry { resource_type: &p.resource_type, tables: &p.tables }))
                .collect();
            (c.name.as_str(), providers)
        })
        .collect();
    let artifact = StructureArtifact {
        generated_date: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        source_url: &tree.source_url,
        documentation_order_preserved: true,
        categories,
    };
    serde_json::to_string_pretty(&artifact).map_err(|e| Error::json("<structure>", e))
}

pub fn save_structure(path: &Path, tree: &DocTree) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, structure_json(tree)?).map_err(|e| Error::io(path, e))?;
    logf!("Wrote structure ({} categories) to {}", tree.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_names_are_stripped() {
        let mut diags = Diagnostics::new();
        let idx = parse_cache(r#"{"Microsoft.X/y": ["AB", "ValidTableName"], "Microsoft.Z/w": ["12345"]}"#, &mut diags).unwrap();
        let tables: Vec<_> = idx.get("Microsoft.X/y").unwrap().iter().cloned().collect();
        assert_eq!(tables, ["ValidTableName"]);
        assert!(!idx.contains("Microsoft.Z/w"));
        assert_eq!(diags.count(DiagnosticKind::Validation), 2);
    }

    #[test]
    fn malformed_json_is_a_miss() {
        let mut diags = Diagnostics::new();
        assert!(parse_cache("{not json", &mut diags).is_none());
        assert!(parse_cache(r#"{"Microsoft.X/y": "StorageBlobLogs"}"#, &mut diags).is_none());
    }

    #[test]
    fn structure_keeps_document_order() {
        let mut tree = DocTree::new("https://example.test/tables");
        let p = tree.category_mut("Zeta").provider_mut("Later");
        p.resource_type = s!("Microsoft.Z/z");
        p.tables.push(TableRef { table_name: s!("ZTable"), url: s!("tables/z") });
        tree.category_mut("Alpha").provider_mut("First");

        let json = structure_json(&tree).unwrap();
        assert!(json.find("\"Zeta\"").unwrap() < json.find("\"Alpha\"").unwrap());
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["DocumentationOrderPreserved"], true);
        assert_eq!(v["SourceUrl"], "https://example.test/tables");
        assert_eq!(v["Categories"]["Zeta"]["Later"]["ResourceType"], "Microsoft.Z/z");
        assert_eq!(v["Categories"]["Zeta"]["Later"]["Tables"][0]["TableName"], "ZTable");
        assert_eq!(v["Categories"]["Zeta"]["Later"]["Tables"][0]["Url"], "tables/z");
        assert_eq!(v["Categories"]["Alpha"]["First"]["ResourceType"], "");
    }
}
