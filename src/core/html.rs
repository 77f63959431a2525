// src/core/html.rs
//
// Case-insensitive tag scanning over raw markup. Offsets found in the
// lowercased copy are valid in the original because `to_lower` only
// touches ASCII.

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii() {
                c.to_ascii_lowercase()
            } else {
                c
            }
        })
        .collect()
}

/// Position of the next `<tag` opener at or after `from` whose name ends there
/// (`<main` matches `<main id=..>` but not `<mainframe>`). `lc` must be lowercased.
fn find_open(lc: &str, tag: &str, from: usize) -> Option<usize> {
    let needle = format!("<{tag}");
    let bytes = lc.as_bytes();
    let mut pos = from;
    loop {
        let at = lc.get(pos..)?.find(&needle)? + pos;
        match bytes.get(at + needle.len()) {
            Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => return Some(at),
            None => return None,
            _ => pos = at + needle.len(),
        }
    }
}

/// Next `<tag ...>...</tag>` block at or after `from`, as byte range of the
/// whole block. The opener must end at the tag name, so `li` skips `<link>`.
pub fn next_tag_block_ci(s: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let tag = to_lower(tag);
    let close = format!("</{tag}");
    let start = find_open(&lc, &tag, from)?;
    let open_end = s[start..].find('>')? + start + 1;
    let close_at = lc[open_end..].find(&close)? + open_end;
    let end = s[close_at..].find('>')? + close_at + 1;
    Some((start, end))
}

pub fn inner_after_open_tag(block: &str) -> String {
    if let Some(oe) = block.find('>') {
        if let Some(cs) = block.rfind('<') {
            if cs > oe {
                return block[oe + 1..cs].to_string();
            }
        }
    }
    s!()
}

pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    super::sanitize::normalize_ws(&out)
}

/// Tag markup → plain text: entities decoded, tags removed, whitespace collapsed.
pub fn clean_text(s: &str) -> String {
    strip_tags(super::sanitize::normalize_entities(s))
}

/// Drop every `<tag ...>...</tag>` block. An unterminated block swallows the rest.
pub fn remove_blocks_ci(s: &str, tag: &str) -> String {
    let lc = to_lower(s);
    let close = format!("</{tag}");
    let mut out = String::with_capacity(s.len());
    let mut pos = 0usize;

    while let Some(start) = find_open(&lc, tag, pos) {
        out.push_str(&s[pos..start]);
        let Some(close_at) = lc[start..].find(&close).map(|i| i + start) else {
            return out;
        };
        pos = match s[close_at..].find('>') {
            Some(gt) => close_at + gt + 1,
            None => return out,
        };
    }
    out.push_str(&s[pos..]);
    out
}

/// Inner markup of the first `<tag ...>` whose opener contains `attr_needle`
/// (lowercase, e.g. `class="content"`), matched against its own closing tag
/// with nesting of the same tag name taken into account.
pub fn element_inner_ci<'a>(s: &'a str, tag: &str, attr_needle: Option<&str>) -> Option<&'a str> {
    let lc = to_lower(s);
    let close = format!("</{tag}");

    let mut pos = 0usize;
    let (open_end, inner_start) = loop {
        let start = find_open(&lc, tag, pos)?;
        let gt = s[start..].find('>')? + start;
        let opener = &lc[start..gt];
        if attr_needle.is_none_or(|n| opener.contains(n)) {
            break (gt, gt + 1);
        }
        pos = gt;
    };

    let mut depth = 1usize;
    let mut cur = open_end;
    loop {
        let next_close = lc[cur..].find(&close).map(|i| i + cur)?;
        let next_open = find_open(&lc, tag, cur).filter(|&o| o < next_close);
        match next_open {
            Some(o) => {
                depth += 1;
                cur = o + tag.len() + 1;
            }
            None => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[inner_start..next_close]);
                }
                cur = next_close + close.len();
            }
        }
    }
}

/// Value of `name="..."` (or single-quoted) inside an opening tag.
pub fn attr_value(open_tag: &str, name: &str) -> Option<String> {
    let lc = to_lower(open_tag);
    let b = lc.as_bytes();
    let mut from = 0usize;
    let at = loop {
        let i = lc.get(from..)?.find(name)? + from;
        let before_ok = i == 0 || b[i - 1].is_ascii_whitespace();
        let rest = lc[i + name.len()..].trim_start();
        if before_ok && rest.starts_with('=') {
            break i + name.len();
        }
        from = i + name.len();
    };
    let rest = open_tag[at..].trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next()?;
    if quote == '"' || quote == '\'' {
        let body = &rest[1..];
        body.find(quote).map(|end| body[..end].to_string())
    } else {
        let end = rest.find(|c: char| c.is_whitespace() || c == '>').unwrap_or(rest.len());
        Some(rest[..end].to_string())
    }
}

/// One heading plus everything up to the next heading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeadingSpan<'a> {
    pub level: u8,
    pub id: Option<String>,
    /// Raw inner markup of the heading element
    pub heading: &'a str,
    /// Raw markup between the heading's close tag and the next heading
    pub content: &'a str,
}

/// `(start, level)` of the next `<h2>`..`<h6>` opener at or after `from`.
fn find_heading_open(lc: &str, from: usize) -> Option<(usize, u8)> {
    let bytes = lc.as_bytes();
    let mut pos = from;
    loop {
        let at = lc.get(pos..)?.find("<h")? + pos;
        if let (Some(&d @ b'2'..=b'6'), Some(&n)) = (bytes.get(at + 2), bytes.get(at + 3)) {
            if n == b'>' || n.is_ascii_whitespace() {
                return Some((at, d - b'0'));
            }
        }
        pos = at + 2;
    }
}

/// Split markup into consecutive, non-overlapping heading spans (levels 2..=6),
/// in document order. Markup before the first heading belongs to no span.
/// A heading without its closing tag is not an anchor.
pub fn heading_spans(s: &str) -> Vec<HeadingSpan<'_>> {
    let lc = to_lower(s);

    // (start, end-of-close, level, id, inner range)
    let mut heads: Vec<(usize, usize, u8, Option<String>, (usize, usize))> = Vec::new();
    let mut pos = 0usize;
    while let Some((start, level)) = find_heading_open(&lc, pos) {
        let Some(gt) = s[start..].find('>').map(|i| i + start) else { break };
        let close = format!("</h{level}");
        let Some(close_at) = lc[gt + 1..].find(&close).map(|i| i + gt + 1) else {
            pos = gt + 1;
            continue;
        };
        let Some(close_end) = s[close_at..].find('>').map(|i| i + close_at + 1) else { break };
        let id = attr_value(&s[start..gt], "id");
        heads.push((start, close_end, level, id, (gt + 1, close_at)));
        pos = close_end;
    }

    let mut spans = Vec::with_capacity(heads.len());
    for (i, (_, close_end, level, id, (is, ie))) in heads.iter().enumerate() {
        let content_end = heads.get(i + 1).map(|h| h.0).unwrap_or(s.len());
        spans.push(HeadingSpan {
            level: *level,
            id: id.clone(),
            heading: &s[*is..*ie],
            content: &s[*close_end..content_end],
        });
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_script_and_style_blocks() {
        let doc = "a<SCRIPT type=x>var h2 = '<h2>';</script>b<style>.x{}</STYLE>c<scripts>keep</scripts>";
        assert_eq!(remove_blocks_ci(doc, "script"), "ab<style>.x{}</STYLE>c<scripts>keep</scripts>");
        let both = remove_blocks_ci(&remove_blocks_ci(doc, "script"), "style");
        assert_eq!(both, "abc<scripts>keep</scripts>");
    }

    #[test]
    fn unterminated_block_swallows_rest() {
        assert_eq!(remove_blocks_ci("keep<script>never closed", "script"), "keep");
    }

    #[test]
    fn element_inner_respects_nesting() {
        let doc = r#"<div class="nav">x</div><div class="content"><div>inner</div><p>tail</p></div><div>after</div>"#;
        let inner = element_inner_ci(doc, "div", Some(r#"class="content""#)).unwrap();
        assert_eq!(inner, "<div>inner</div><p>tail</p>");
    }

    #[test]
    fn element_inner_without_needle() {
        let doc = "<header>h</header><main id=\"main\"><h2>A</h2></main>";
        assert_eq!(element_inner_ci(doc, "main", None), Some("<h2>A</h2>"));
        assert_eq!(element_inner_ci(doc, "article", None), None);
    }

    #[test]
    fn attr_values() {
        assert_eq!(attr_value(r#"<h2 class="x" id="storage">"#, "id").as_deref(), Some("storage"));
        assert_eq!(attr_value("<h3 id='kv'>", "id").as_deref(), Some("kv"));
        assert_eq!(attr_value("<h3 data-id=\"no\">", "id"), None);
        assert_eq!(attr_value("<a href=tables/foo>", "href").as_deref(), Some("tables/foo"));
    }

    #[test]
    fn spans_are_ordered_and_non_overlapping() {
        let doc = "<h1>Title</h1>intro<h2 id=\"a\">A</h2>one<H3>B <em>x</em></H3>two<h2>C</h2>three";
        let spans = heading_spans(doc);
        assert_eq!(spans.len(), 3);
        assert_eq!((spans[0].level, spans[0].id.as_deref(), spans[0].heading, spans[0].content), (2, Some("a"), "A", "one"));
        assert_eq!((spans[1].level, spans[1].heading, spans[1].content), (3, "B <em>x</em>", "two"));
        assert_eq!((spans[2].level, spans[2].heading, spans[2].content), (2, "C", "three"));
    }

    #[test]
    fn header_and_hr_are_not_headings() {
        let doc = "<h2>A</h2><header>x</header><hr/><h7>no</h7>body";
        let spans = heading_spans(doc);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].content, "<header>x</header><hr/><h7>no</h7>body");
    }

    #[test]
    fn tag_blocks_match_whole_names_only() {
        let doc = r#"<link rel="x"><LI class="a">one</li><abbr>ab</abbr><a href="t">two</a>"#;
        let (s, e) = next_tag_block_ci(doc, "li", 0).unwrap();
        assert_eq!(&doc[s..e], r#"<LI class="a">one</li>"#);
        let (s, e) = next_tag_block_ci(doc, "a", 0).unwrap();
        assert_eq!(&doc[s..e], r#"<a href="t">two</a>"#);
        assert_eq!(next_tag_block_ci(doc, "ul", 0), None);
    }

    #[test]
    fn clean_text_decodes_and_collapses() {
        assert_eq!(clean_text("<span>Storage</span>&nbsp;&amp;\n  <b>Backup</b>"), "Storage & Backup");
    }
}
