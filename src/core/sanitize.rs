// src/core/sanitize.rs
use std::sync::LazyLock;

use regex::Regex;

static NAME_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\b(?:tables?|logs?)\s*$").expect("static regex"));

pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ").replace("&#160;", " ").replace("&amp;", "&")
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Category/provider name: trimmed, one trailing "table(s)"/"log(s)" word removed.
/// A name that is nothing but the suffix ("Logs") is kept as-is.
pub fn normalize_section_name(s: &str) -> String {
    let t = s.trim();
    let cut = NAME_SUFFIX.replace(t, "");
    let cut = cut.trim();
    if cut.is_empty() { t.to_string() } else { cut.to_string() }
}
