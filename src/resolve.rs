// src/resolve.rs
//
// (ResourceType, diagnostic category) → log table name.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::config::consts::METRICS_TABLE;
use crate::core::validate::is_valid_table_name;
use crate::core::{DiagnosticKind, Diagnostics};
use crate::mapping::MappingIndex;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CategoryType {
    Logs,
    Metrics,
}

impl FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "logs" | "log" => Ok(CategoryType::Logs),
            "metrics" | "metric" => Ok(CategoryType::Metrics),
            other => Err(format!("unknown category type: {other}")),
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { CategoryType::Logs => "Logs", CategoryType::Metrics => "Metrics" })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnknownReason {
    InvalidInput,
    ResourceTypeNotDocumented,
    CategoryNotFound,
    ValidationFailed,
}

impl UnknownReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnknownReason::InvalidInput => "invalid input",
            UnknownReason::ResourceTypeNotDocumented => "resourceType not documented",
            UnknownReason::CategoryNotFound => "category not found for resourceType",
            UnknownReason::ValidationFailed => "validation failed",
        }
    }
}

impl fmt::Display for UnknownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Table(String),
    Unknown(UnknownReason),
}

impl Resolution {
    pub fn table(&self) -> Option<&str> {
        match self {
            Resolution::Table(t) => Some(t),
            Resolution::Unknown(_) => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Resolution::Unknown(_))
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Table(t) => f.write_str(t),
            Resolution::Unknown(r) => write!(f, "Unknown ({r})"),
        }
    }
}

/// Which matching tier produced a hit (debug logging only).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tier {
    Exact,
    ExactIgnoreCase,
    Contains,
    ContainedIn,
}

/// Per-run resolver. Owns the memo table and its own diagnostics.
pub struct Resolver {
    index: MappingIndex,
    memo: HashMap<(String, String), Resolution>,
    diags: Diagnostics,
}

impl Resolver {
    pub fn new(index: MappingIndex) -> Self {
        Self { index, memo: HashMap::new(), diags: Diagnostics::new() }
    }

    pub fn memo_len(&self) -> usize { self.memo.len() }
    pub fn diagnostics(&self) -> &Diagnostics { &self.diags }

    pub fn take_diagnostics(&mut self) -> Diagnostics {
        std::mem::take(&mut self.diags)
    }

    pub fn resolve(&mut self, resource_type: &str, category: &str, kind: CategoryType) -> Resolution {
        if kind == CategoryType::Metrics {
            return Resolution::Table(s!(METRICS_TABLE));
        }
        if resource_type.trim().is_empty() || category.trim().is_empty() {
            return Resolution::Unknown(UnknownReason::InvalidInput);
        }

        let key = (resource_type.to_string(), category.to_string());
        if let Some(hit) = self.memo.get(&key) {
            return hit.clone();
        }

        let result = match self.index.get(resource_type) {
            None => Resolution::Unknown(UnknownReason::ResourceTypeNotDocumented),
            Some(candidates) => match match_category(candidates, category) {
                Some((table, tier)) => {
                    logd!("{resource_type} / {category} → {table} ({tier:?})");
                    Resolution::Table(table.to_string())
                }
                None => Resolution::Unknown(UnknownReason::CategoryNotFound),
            },
        };

        let result = match result {
            Resolution::Table(t) if !is_valid_table_name(&t) => {
                self.diags.push(
                    DiagnosticKind::Resolution,
                    format!("{resource_type} / {category}: resolved to invalid table name {t:?}"),
                );
                Resolution::Unknown(UnknownReason::ValidationFailed)
            }
            other => other,
        };

        self.memo.insert(key, result.clone());
        result
    }
}

fn match_category<'a>(candidates: &'a BTreeSet<String>, category: &str) -> Option<(&'a str, Tier)> {
    if let Some(t) = candidates.get(category) {
        return Some((t, Tier::Exact));
    }
    if let Some(t) = candidates.iter().find(|t| t.eq_ignore_ascii_case(category)) {
        return Some((t, Tier::ExactIgnoreCase));
    }

    let cat_lc = category.to_lowercase();

    // Shortest containing name wins; equal lengths keep sorted order.
    if let Some(t) = candidates
        .iter()
        .filter(|t| t.to_lowercase().contains(&cat_lc))
        .min_by_key(|t| t.len())
    {
        return Some((t, Tier::Contains));
    }

    let mut reverse = candidates.iter().filter(|t| cat_lc.contains(&t.to_lowercase()));
    match (reverse.next(), reverse.next()) {
        (Some(t), None) => Some((t, Tier::ContainedIn)),
        _ => None,
    }
}
