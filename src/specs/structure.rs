// src/specs/structure.rs
//! Scraping *spec* for the tables-by-category page.
//!
//! Page shape:
//! - `<h2>` = category ("Security", "Storage tables", …)
//! - `<h3>`..`<h6>` = resource provider under the current category
//! - section body: an optional `<p>Microsoft.Namespace/type</p>` and a run of
//!   links into `tables/<name>` (anchors, or bracket links in raw markdown).
//!
//! Headings are segmented with the hand-rolled scanner in `core::html`; only
//! the token grammars inside a section use regexes.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::html::{self, HeadingSpan};
use crate::core::sanitize::{normalize_entities, normalize_section_name};
use crate::model::{DocTree, TableRef};

/// Navigation / boilerplate headings; compared case-insensitively.
const HEADING_DENYLIST: &[&str] = &[
    "in this article",
    "feedback",
    "table of contents",
    "see also",
    "next steps",
    "additional resources",
    "related content",
    "related articles",
    "in this section",
    "submit and view feedback for",
];

const MIN_HEADING_LEN: usize = 3;
const MAX_HEADING_LEN: usize = 100;

/// Content wrappers tried in order: (tag, opener needle).
const CONTENT_CONTAINERS: &[(&str, Option<&str>)] = &[
    ("main", None),
    ("div", Some(r#"class="content""#)),
    ("article", None),
];

static RESOURCE_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<p(?:\s[^>]*)?>\s*(microsoft\.[a-z0-9]+(?:/[a-z0-9]+)*)\s*</p>")
        .expect("static regex")
});
static TABLE_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*?href\s*=\s*["']((?:[^"']*/)?tables/[^"']+)["'][^>]*>(.*?)</a>"#)
        .expect("static regex")
});
static TABLE_BRACKET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\[\]]+)\]\(((?:[^()\s]*/)?tables/[^()\s]+)\)").expect("static regex")
});

/// Parse the page into an ordered tree. `category_filter` keeps only the
/// category whose normalized name matches exactly (case-sensitive).
pub fn extract(markup: &str, category_filter: Option<&str>) -> DocTree {
    extract_with_source(markup, category_filter, "")
}

pub fn extract_with_source(markup: &str, category_filter: Option<&str>, source_url: &str) -> DocTree {
    let cleaned = html::remove_blocks_ci(&html::remove_blocks_ci(markup, "script"), "style");
    let region = content_region(&cleaned);

    let mut tree = DocTree::new(source_url);
    let mut current_category: Option<String> = None;
    let mut current_provider: Option<String> = None;

    for span in html::heading_spans(region) {
        let Some(title) = heading_title(&span) else { continue };

        if span.level == 2 {
            let name = normalize_section_name(&title);
            current_provider = None;
            if category_filter.is_some_and(|f| f != name) {
                logd!("Skipping category '{name}' (filter)");
                current_category = None;
                continue;
            }
            tree.category_mut(&name);
            current_category = Some(name);
        } else if let Some(cat) = &current_category {
            let name = normalize_section_name(&title);
            tree.category_mut(cat).provider_mut(&name);
            current_provider = Some(name);
        }

        let Some(cat) = &current_category else { continue };

        let resource_type = find_resource_type(span.content);
        let tables = find_table_refs(span.content);
        if tables.is_empty() {
            continue;
        }

        let category = tree.category_mut(cat);
        let provider = match &current_provider {
            Some(p) => category.provider_mut(p),
            None => category.uncategorized_mut(),
        };
        logd!("{} / {}: +{} tables", cat, provider.name, tables.len());
        provider.tables.extend(tables);
        if let Some(rt) = resource_type {
            if provider.has_resource_type() && provider.resource_type != rt {
                logd!("{}: resource type {} replaced by {}", provider.name, provider.resource_type, rt);
            }
            provider.resource_type = rt;
        }
    }

    logf!(
        "Extracted {} categories, {} tables from {}",
        tree.len(),
        tree.table_count(),
        if source_url.is_empty() { "markup" } else { source_url }
    );
    tree
}

/// Primary content region, or the whole document when no wrapper is known.
pub(crate) fn content_region(doc: &str) -> &str {
    for (tag, needle) in CONTENT_CONTAINERS {
        if let Some(inner) = html::element_inner_ci(doc, tag, *needle) {
            return inner;
        }
    }
    logw!("No content container found; scanning whole document");
    doc
}

/// Cleaned heading text, or `None` when it is navigation noise or out of range.
pub(crate) fn heading_title(span: &HeadingSpan<'_>) -> Option<String> {
    let title = html::clean_text(span.heading);
    let len = title.chars().count();
    if !(MIN_HEADING_LEN..=MAX_HEADING_LEN).contains(&len) {
        return None;
    }
    let lc = title.to_lowercase();
    if HEADING_DENYLIST.iter().any(|d| *d == lc) {
        return None;
    }
    Some(title)
}

/// First `<p>Microsoft.X/y</p>` token in a section, as written.
pub(crate) fn find_resource_type(content: &str) -> Option<String> {
    RESOURCE_TYPE
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Anchor references first, then bracket links, each in document order.
pub(crate) fn find_table_refs(content: &str) -> Vec<TableRef> {
    let mut out = Vec::new();
    for c in TABLE_ANCHOR.captures_iter(content) {
        let url = normalize_entities(&c[1]);
        let name = html::clean_text(&c[2]);
        out.push(table_ref(name, url));
    }
    for c in TABLE_BRACKET.captures_iter(content) {
        let url = c[2].to_string();
        let name = html::clean_text(&c[1]);
        out.push(table_ref(name, url));
    }
    out
}

fn table_ref(name: String, url: String) -> TableRef {
    let table_name = if name.is_empty() { name_from_url(&url) } else { name };
    TableRef { table_name, url }
}

/// `../tables/storagebloblogs.md#columns` → `storagebloblogs`
fn name_from_url(url: &str) -> String {
    let path = url.split(['#', '?']).next().unwrap_or(url);
    let last = path.trim_end_matches('/').rsplit('/').next().unwrap_or(path);
    last.trim_end_matches(".md").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_type_first_match() {
        let c = "<p>Text</p><p> Microsoft.KeyVault/vaults </p><p>Microsoft.Other/x</p>";
        assert_eq!(find_resource_type(c).as_deref(), Some("Microsoft.KeyVault/vaults"));
        assert_eq!(find_resource_type("<p>microsoft.insights/components</p>").as_deref(), Some("microsoft.insights/components"));
        assert_eq!(find_resource_type("<p>Microsoft.Sql/servers/databases</p>").as_deref(), Some("Microsoft.Sql/servers/databases"));
        assert_eq!(find_resource_type("<li>Microsoft.KeyVault/vaults</li>"), None);
    }

    #[test]
    fn both_reference_styles_in_order() {
        let c = r#"[QueueLogs](../tables/storagequeuelogs.md)
            <a href="tables/storagebloblogs" data-linktype="relative-path">StorageBlobLogs</a>
            <a href="/en-us/azure/overview">not a table</a>
            <a class="x" href='../tables/storagefilelogs'>Storage<b>File</b>Logs</a>"#;
        let refs = find_table_refs(c);
        let names: Vec<_> = refs.iter().map(|t| t.table_name.as_str()).collect();
        assert_eq!(names, ["StorageBlobLogs", "StorageFileLogs", "QueueLogs"]);
        assert_eq!(refs[0].url, "tables/storagebloblogs");
        assert_eq!(refs[2].url, "../tables/storagequeuelogs.md");
    }

    #[test]
    fn empty_anchor_text_falls_back_to_path() {
        let refs = find_table_refs(r#"<a href="tables/storagebloblogs.md#columns"></a>"#);
        assert_eq!(refs[0].table_name, "storagebloblogs");
    }

    #[test]
    fn denylist_and_length() {
        fn title(h: &str) -> Option<String> {
            heading_title(&HeadingSpan { level: 2, id: None, heading: h, content: "" })
        }
        assert_eq!(title("In this <b>article</b>"), None);
        assert_eq!(title("FEEDBACK"), None);
        assert_eq!(title("AI"), None);
        assert_eq!(title(&"x".repeat(101)), None);
        assert_eq!(title("Storage &amp; Backup").as_deref(), Some("Storage & Backup"));
    }
}
