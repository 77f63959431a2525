// src/model.rs
//
// Ordered documentation tree: Category → ResourceProvider → {ResourceType, Tables}.
// Both levels are name-keyed `IndexMap`s so iteration is document order and a
// repeated heading merges into the existing node.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::consts::UNCATEGORIZED;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableRef {
    pub table_name: String,
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceProvider {
    pub name: String,
    /// Empty until a section under this provider names one.
    pub resource_type: String,
    /// Document order, duplicates kept.
    pub tables: Vec<TableRef>,
}

impl ResourceProvider {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), ..Self::default() }
    }

    pub fn has_resource_type(&self) -> bool {
        !self.resource_type.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub providers: IndexMap<String, ResourceProvider>,
}

impl Category {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), providers: IndexMap::new() }
    }

    /// Existing provider by name, or a new one appended at the end.
    pub fn provider_mut(&mut self, name: &str) -> &mut ResourceProvider {
        self.providers
            .entry(name.to_string())
            .or_insert_with(|| ResourceProvider::new(name))
    }

    pub fn uncategorized_mut(&mut self) -> &mut ResourceProvider {
        self.provider_mut(UNCATEGORIZED)
    }

    pub fn provider(&self, name: &str) -> Option<&ResourceProvider> {
        self.providers.get(name)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocTree {
    pub source_url: String,
    pub categories: IndexMap<String, Category>,
}

impl DocTree {
    pub fn new(source_url: &str) -> Self {
        Self { source_url: source_url.to_string(), categories: IndexMap::new() }
    }

    pub fn category_mut(&mut self, name: &str) -> &mut Category {
        self.categories
            .entry(name.to_string())
            .or_insert_with(|| Category::new(name))
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    pub fn len(&self) -> usize { self.categories.len() }
    pub fn is_empty(&self) -> bool { self.categories.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    /// All providers in document order, paired with their category.
    pub fn providers(&self) -> impl Iterator<Item = (&Category, &ResourceProvider)> {
        self.categories
            .values()
            .flat_map(|c| c.providers.values().map(move |p| (c, p)))
    }

    pub fn table_count(&self) -> usize {
        self.providers().map(|(_, p)| p.tables.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuse_keeps_first_position() {
        let mut tree = DocTree::new("u");
        tree.category_mut("Storage");
        tree.category_mut("Security");
        tree.category_mut("Storage").provider_mut("Blob");
        let names: Vec<_> = tree.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Storage", "Security"]);
        assert_eq!(tree.category("Storage").unwrap().providers.len(), 1);
    }

    #[test]
    fn uncategorized_is_a_regular_provider() {
        let mut cat = Category::new("Storage");
        cat.uncategorized_mut().tables.push(TableRef { table_name: s!("StorageBlobLogs"), url: s!("tables/x") });
        cat.uncategorized_mut();
        assert_eq!(cat.providers.len(), 1);
        assert_eq!(cat.provider(UNCATEGORIZED).unwrap().tables.len(), 1);
    }
}
