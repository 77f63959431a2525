// src/mapping.rs
//
// ResourceType → table-name index, built from the extracted documentation
// plus a few hand-curated overrides. Every name that reaches the index has
// passed the validator.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::validate::{is_valid_table_name, validate_or_record};
use crate::core::Diagnostics;
use crate::model::DocTree;
use crate::specs::{self, ListSection};

/// Section-title keyword → resource type, for list pages that don't print the
/// type. Evaluated top to bottom, first hit wins, so narrower keywords go first.
pub const TYPE_KEYWORDS: &[(&str, &str)] = &[
    ("API Management", "Microsoft.ApiManagement/service"),
    ("Application Gateway", "Microsoft.Network/applicationGateways"),
    ("Application Insights", "Microsoft.Insights/components"),
    ("Front Door", "Microsoft.Network/frontDoors"),
    ("Firewall", "Microsoft.Network/azureFirewalls"),
    ("Key Vault", "Microsoft.KeyVault/vaults"),
    ("Kubernetes", "Microsoft.ContainerService/managedClusters"),
    ("SQL Managed Instance", "Microsoft.Sql/managedInstances"),
    ("SQL Database", "Microsoft.Sql/servers/databases"),
    ("Cosmos DB", "Microsoft.DocumentDB/databaseAccounts"),
    ("Event Hubs", "Microsoft.EventHub/namespaces"),
    ("Service Bus", "Microsoft.ServiceBus/namespaces"),
    ("Logic Apps", "Microsoft.Logic/workflows"),
    ("Data Factory", "Microsoft.DataFactory/factories"),
    ("App Service", "Microsoft.Web/sites"),
    ("Storage", "Microsoft.Storage/storageAccounts"),
];

/// Known-good tables for high-traffic types whose doc sections parse badly.
/// Only fills a key that has no valid table yet.
pub const KNOWN_OVERRIDES: &[(&str, &[&str])] = &[
    ("Microsoft.KeyVault/vaults", &["AzureDiagnostics", "KeyVaultLogs"]),
    ("Microsoft.Storage/storageAccounts/blobServices", &["StorageBlobLogs"]),
    ("Microsoft.Storage/storageAccounts/queueServices", &["StorageQueueLogs"]),
    ("Microsoft.Storage/storageAccounts/tableServices", &["StorageTableLogs"]),
    ("Microsoft.Storage/storageAccounts/fileServices", &["StorageFileLogs"]),
    ("Microsoft.Network/applicationGateways", &["AGWAccessLogs", "AGWFirewallLogs", "AGWPerformanceLogs", "AzureDiagnostics"]),
    ("Microsoft.Network/azureFirewalls", &["AZFWApplicationRule", "AZFWDnsQuery", "AZFWNetworkRule", "AzureDiagnostics"]),
    ("Microsoft.ContainerService/managedClusters", &["AKSAudit", "AKSAuditAdmin", "AKSControlPlane", "AzureDiagnostics"]),
    ("Microsoft.ApiManagement/service", &["ApiManagementGatewayLogs", "AzureDiagnostics"]),
    ("Microsoft.Web/sites", &["AppServiceAppLogs", "AppServiceAuditLogs", "AppServiceConsoleLogs", "AppServiceHTTPLogs", "AppServicePlatformLogs"]),
];

/// Sorted, deduplicated table names per resource type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingIndex {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl MappingIndex {
    pub fn new() -> Self { Self::default() }

    pub fn insert<I, S>(&mut self, resource_type: &str, tables: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .entry(resource_type.to_string())
            .or_default()
            .extend(tables.into_iter().map(Into::into));
    }

    /// Exact key first, then a case-insensitive match.
    pub fn get(&self, resource_type: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(resource_type).or_else(|| {
            self.entries
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(resource_type))
                .map(|(_, v)| v)
        })
    }

    pub fn contains(&self, resource_type: &str) -> bool {
        self.get(resource_type).is_some()
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.entries.iter()
    }

    pub fn table_count(&self) -> usize {
        self.entries.values().map(BTreeSet::len).sum()
    }

    /// Drop names failing the validator, then keys left empty.
    pub fn retain_valid(&mut self, context: &str, diags: &mut Diagnostics) {
        self.entries.retain(|rt, tables| {
            tables.retain(|t| validate_or_record(t, &format!("{context} {rt}"), diags));
            if tables.is_empty() {
                logw!("{context}: {rt} has no valid tables, dropped");
            }
            !tables.is_empty()
        });
    }

    fn has_valid_table(&self, resource_type: &str) -> bool {
        self.get(resource_type)
            .is_some_and(|t| t.iter().any(|n| is_valid_table_name(n)))
    }
}

/// Index from the category tree. Providers without a resource type are skipped.
pub fn build(tree: &DocTree, diags: &mut Diagnostics) -> MappingIndex {
    let mut index = MappingIndex::new();
    let mut untyped = 0usize;
    for (_, provider) in tree.providers() {
        if !provider.has_resource_type() {
            untyped += 1;
            continue;
        }
        index.insert(&provider.resource_type, provider.tables.iter().map(|t| t.table_name.trim()));
    }
    if untyped > 0 {
        logd!("{untyped} providers without a resource type");
    }
    finish(index, diags)
}

/// Index from a flat, list-based page.
pub fn build_from_sections(markup: &str, diags: &mut Diagnostics) -> MappingIndex {
    build_from_list(&specs::extract_sections(markup), diags)
}

pub fn build_from_list(sections: &[ListSection], diags: &mut Diagnostics) -> MappingIndex {
    let mut index = MappingIndex::new();
    for sec in sections {
        let rt = sec.resource_type.clone().or_else(|| infer_resource_type(&sec.title).map(str::to_string));
        match rt {
            Some(rt) => index.insert(&rt, sec.tables.iter().map(String::as_str)),
            None => logd!("No resource type for section '{}'", sec.title),
        }
    }
    finish(index, diags)
}

/// First `TYPE_KEYWORDS` entry whose keyword occurs in `title` (case-insensitive).
pub fn infer_resource_type(title: &str) -> Option<&'static str> {
    let lc = title.to_lowercase();
    TYPE_KEYWORDS
        .iter()
        .find(|(kw, _)| lc.contains(&kw.to_lowercase()))
        .map(|(_, rt)| *rt)
}

fn finish(mut index: MappingIndex, diags: &mut Diagnostics) -> MappingIndex {
    apply_overrides(&mut index);
    index.retain_valid("mapping", diags);
    logf!("Mapping index: {} resource types, {} tables", index.len(), index.table_count());
    index
}

pub fn apply_overrides(index: &mut MappingIndex) {
    for (rt, tables) in KNOWN_OVERRIDES {
        if index.has_valid_table(rt) {
            continue;
        }
        logd!("Override applied for {rt}");
        index.entries.insert(rt.to_string(), tables.iter().map(|t| t.to_string()).collect());
    }
}
