// src/inventory.rs
//
// Resource inventory seam. The runner only sees the `Inventory` trait; the
// bundled implementation reads a JSON export:
//
// {"Subscriptions": [{"Name": "..", "Id": "..", "Resources": [{
//     "ResourceId": "..", "Name": "..", "ResourceType": "..", "ResourceGroup": "..",
//     "Categories": [{"Name": "AuditEvent", "CategoryType": "Logs"}],
//     "Enabled": ["AuditEvent"] }]}]}

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::resolve::CategoryType;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subscription {
    pub name: String,
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resource {
    pub resource_id: String,
    pub name: String,
    pub resource_type: String,
    pub resource_group: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticCategory {
    pub name: String,
    pub category_type: CategoryType,
}

pub trait Inventory {
    fn subscriptions(&self) -> Result<Vec<Subscription>>;
    fn resources(&self, subscription: &Subscription) -> Result<Vec<Resource>>;
    fn diagnostic_categories(&self, resource: &Resource) -> Result<Vec<DiagnosticCategory>>;
    /// Names of the categories currently switched on in a diagnostic setting.
    fn enabled_categories(&self, resource: &Resource) -> Result<Vec<String>>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InventoryFile {
    #[serde(default)]
    subscriptions: Vec<SubscriptionRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SubscriptionRecord {
    name: String,
    id: String,
    #[serde(default)]
    resources: Vec<ResourceRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ResourceRecord {
    resource_id: String,
    name: String,
    resource_type: String,
    #[serde(default)]
    resource_group: String,
    #[serde(default)]
    categories: Vec<CategoryRecord>,
    #[serde(default)]
    enabled: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CategoryRecord {
    name: String,
    category_type: String,
}

/// Inventory backed by a JSON export file.
#[derive(Debug)]
pub struct JsonInventory {
    file: InventoryFile,
}

impl JsonInventory {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let file = serde_json::from_str(&text).map_err(|e| Error::json(path, e))?;
        Ok(Self { file })
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let file = serde_json::from_str(text).map_err(|e| Error::json("<inventory>", e))?;
        Ok(Self { file })
    }

    fn record(&self, resource: &Resource) -> Result<&ResourceRecord> {
        self.file
            .subscriptions
            .iter()
            .flat_map(|s| s.resources.iter())
            .find(|r| r.resource_id == resource.resource_id)
            .ok_or_else(|| Error::Inventory(format!("unknown resource {}", resource.resource_id)))
    }
}

impl Inventory for JsonInventory {
    fn subscriptions(&self) -> Result<Vec<Subscription>> {
        Ok(self
            .file
            .subscriptions
            .iter()
            .map(|s| Subscription { name: s.name.clone(), id: s.id.clone() })
            .collect())
    }

    fn resources(&self, subscription: &Subscription) -> Result<Vec<Resource>> {
        let sub = self
            .file
            .subscriptions
            .iter()
            .find(|s| s.id == subscription.id)
            .ok_or_else(|| Error::Inventory(format!("unknown subscription {}", subscription.id)))?;
        Ok(sub
            .resources
            .iter()
            .map(|r| Resource {
                resource_id: r.resource_id.clone(),
                name: r.name.clone(),
                resource_type: r.resource_type.clone(),
                resource_group: r.resource_group.clone(),
            })
            .collect())
    }

    fn diagnostic_categories(&self, resource: &Resource) -> Result<Vec<DiagnosticCategory>> {
        self.record(resource)?
            .categories
            .iter()
            .map(|c| {
                let category_type = c.category_type.parse::<CategoryType>().map_err(|e| {
                    Error::Inventory(format!("{} / {}: {e}", resource.name, c.name))
                })?;
                Ok(DiagnosticCategory { name: c.name.clone(), category_type })
            })
            .collect()
    }

    fn enabled_categories(&self, resource: &Resource) -> Result<Vec<String>> {
        Ok(self.record(resource)?.enabled.clone())
    }
}
