// src/specs/sections.rs
//! Scraping *spec* for flat, list-based pages:
//!
//! ```text
//! <h2>API Management</h2>
//! <p>Microsoft.ApiManagement/service</p>     (optional)
//! <ul><li>ApiManagementGatewayLogs</li><li><a href=..>AzureDiagnostics</a></li></ul>
//! ```
//!
//! Every heading level anchors its own section; there is no category/provider
//! nesting. Resource-type inference from titles lives with the mapping builder.

use crate::core::html;

use super::structure::{content_region, find_resource_type, heading_title};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListSection {
    pub title: String,
    pub resource_type: Option<String>,
    /// Candidate names from `<li>` items, document order, unvalidated.
    pub tables: Vec<String>,
}

pub fn extract_sections(markup: &str) -> Vec<ListSection> {
    let cleaned = html::remove_blocks_ci(&html::remove_blocks_ci(markup, "script"), "style");
    let region = content_region(&cleaned);

    let mut out = Vec::new();
    for span in html::heading_spans(region) {
        let Some(title) = heading_title(&span) else { continue };
        let tables = list_items(span.content);
        if tables.is_empty() {
            continue;
        }
        out.push(ListSection {
            title,
            resource_type: find_resource_type(span.content),
            tables,
        });
    }
    logf!("Extracted {} list sections", out.len());
    out
}

/// `<li>` entries inside `<ul>` blocks. Anchor text wins over the item text;
/// only the leading word of a descriptive item is kept.
fn list_items(content: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut ul_pos = 0usize;
    while let Some((ul_s, ul_e)) = html::next_tag_block_ci(content, "ul", ul_pos) {
        let ul = &content[ul_s..ul_e];
        ul_pos = ul_e;

        let mut li_pos = 0usize;
        while let Some((li_s, li_e)) = html::next_tag_block_ci(ul, "li", li_pos) {
            let li = html::inner_after_open_tag(&ul[li_s..li_e]);
            li_pos = li_e;

            let text = match html::next_tag_block_ci(&li, "a", 0) {
                Some((a_s, a_e)) => html::clean_text(&html::inner_after_open_tag(&li[a_s..a_e])),
                None => html::clean_text(&li),
            };
            let word = text
                .split_whitespace()
                .next()
                .unwrap_or("")
                .trim_end_matches([':', ',', ';', '.', '-']);
            if !word.is_empty() {
                out.push(word.to_string());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_with_items() {
        let doc = r#"
            <h2>API Management</h2>
            <ul><li>ApiManagementGatewayLogs</li><li><a href="x">AzureDiagnostics</a> (legacy)</li></ul>
            <h2>Key Vault</h2>
            <p>Microsoft.KeyVault/vaults</p>
            <ul>
              <li>AzureDiagnostics: resource logs</li>
            </ul>
            <h2>See also</h2>
            <ul><li>Nothing</li></ul>
            <h3>Empty</h3><p>no list</p>
        "#;
        let secs = extract_sections(doc);
        assert_eq!(secs.len(), 2);
        assert_eq!(secs[0].title, "API Management");
        assert_eq!(secs[0].resource_type, None);
        assert_eq!(secs[0].tables, ["ApiManagementGatewayLogs", "AzureDiagnostics"]);
        assert_eq!(secs[1].resource_type.as_deref(), Some("Microsoft.KeyVault/vaults"));
        assert_eq!(secs[1].tables, ["AzureDiagnostics"]);
    }

    #[test]
    fn lists_outside_main_content_are_ignored() {
        let doc = r#"
            <header><h2>Storage menu</h2><ul><li>Pricing</li><li>Overview</li></ul></header>
            <main>
              <h2>Key Vault</h2>
              <ul><li><link rel="prefetch" href="x"><a href="tables/keyvaultlogs">KeyVaultLogs</a></li></ul>
            </main>
            <footer><h2>Storage links</h2><ul><li>Support</li></ul></footer>
        "#;
        let secs = extract_sections(doc);
        assert_eq!(secs.len(), 1);
        assert_eq!(secs[0].title, "Key Vault");
        assert_eq!(secs[0].tables, ["KeyVaultLogs"]);
    }

    #[test]
    fn abbr_is_not_an_anchor() {
        let doc = r#"<main><h2>Storage</h2><ul>
            <li><abbr title="blob">Storage</abbr> <a href="tables/storagebloblogs">StorageBlobLogs</a></li>
        </ul></main>"#;
        assert_eq!(extract_sections(doc)[0].tables, ["StorageBlobLogs"]);
    }
}
