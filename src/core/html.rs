// src/core/html.rs
//
// Low-level HTML string scanning. Deliberately naive: no DOM, just tolerant,
// case-insensitive tag matching over the raw text. Lowercasing is ASCII-only,
// so byte offsets in the lowered copy line up with the original.

use super::sanitize::{normalize_entities, normalize_ws};

/// ASCII-only lowercasing for tag/attribute matching.
pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// True when `lc[at..]` starts with `<tag` followed by a tag-name boundary,
/// so `<t` never matches `<table` and `<tr` never matches `<track`.
fn is_open_at(lc: &str, at: usize, tag: &str) -> bool {
    let rest = &lc.as_bytes()[at..];
    if rest.len() < tag.len() + 1 || rest[0] != b'<' || &rest[1..=tag.len()] != tag.as_bytes() {
        return false;
    }
    matches!(rest.get(tag.len() + 1), None | Some(b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r'))
}

fn is_close_at(lc: &str, at: usize, tag: &str) -> bool {
    let rest = &lc.as_bytes()[at..];
    rest.len() >= tag.len() + 2
        && rest[0] == b'<'
        && rest[1] == b'/'
        && &rest[2..tag.len() + 2] == tag.as_bytes()
        && matches!(rest.get(tag.len() + 2), None | Some(b'>' | b' ' | b'\t' | b'\n' | b'\r'))
}

/// Find the next complete `<tag …>…</tag>` element at or after `from`,
/// counting nested elements of the same name. `lc` must be `to_lower(s)`.
/// Returns byte range `(start, end)` covering the opener through the closer.
fn next_element_lc(s: &str, lc: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let needle = join!("<", tag);
    let mut at = from;
    let start = loop {
        let cand = lc.get(at..)?.find(&needle)? + at;
        if is_open_at(lc, cand, tag) {
            break cand;
        }
        at = cand + 1;
    };

    let mut pos = s[start..].find('>')? + start + 1;
    let mut depth = 1usize;
    while depth > 0 {
        let lt = lc[pos..].find('<')? + pos;
        if is_close_at(lc, lt, tag) {
            depth -= 1;
        } else if is_open_at(lc, lt, tag) {
            depth += 1;
        }
        pos = lt + 1;
    }
    // pos sits just past the '<' of the final closer
    let end = s[pos..].find('>')? + pos + 1;
    Some((start, end))
}

/// Nesting-aware version of a tag-block search, e.g. `next_element_ci(doc, "table", 0)`.
pub fn next_element_ci(s: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    next_element_lc(s, &lc, &to_lower(tag), from)
}

/// All top-level `<tag>` elements inside `s`, in document order.
pub fn elements_ci<'a>(s: &'a str, tag: &str) -> Vec<&'a str> {
    let lc = to_lower(s);
    let tag = to_lower(tag);
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some((start, end)) = next_element_lc(s, &lc, &tag, pos) {
        out.push(&s[start..end]);
        pos = end;
    }
    out
}

/// The opening tag of a block: `<td class="x">…</td>` → `<td class="x">`.
pub fn opener(block: &str) -> &str {
    match block.find('>') {
        Some(gt) => &block[..=gt],
        None => block,
    }
}

/// Attribute value from an opening tag. Tolerates single, double or no quotes.
pub fn attr_value(open_tag: &str, name: &str) -> Option<String> {
    let lc = to_lower(open_tag);
    let needle = join!(&to_lower(name), "=");
    let mut at = 0usize;
    let pos = loop {
        let cand = lc.get(at..)?.find(&needle)? + at;
        let boundary = cand > 0 && lc.as_bytes()[cand - 1].is_ascii_whitespace();
        if boundary {
            break cand;
        }
        at = cand + 1;
    };

    let val = open_tag[pos + needle.len()..].trim_start();
    let (quote, start_off) = match val.as_bytes().first() {
        Some(b'"') => (Some('"'), 1),
        Some(b'\'') => (Some('\''), 1),
        _ => (None, 0),
    };
    let end = match quote {
        Some(q) => val[start_off..].find(q).map(|e| start_off + e),
        None => val.find(|c: char| c.is_ascii_whitespace() || c == '>'),
    }
    .unwrap_or(val.len());
    Some(normalize_entities(&val[start_off..end]))
}

/// First `<tag>` element whose `class` attribute equals `class` exactly
/// (whitespace-normalized, full attribute string).
pub fn find_by_class<'a>(doc: &'a str, tag: &str, class: &str) -> Option<&'a str> {
    let lc = to_lower(doc);
    let tag = to_lower(tag);
    let want = normalize_ws(class);
    let mut pos = 0usize;
    while let Some((start, end)) = next_element_lc(doc, &lc, &tag, pos) {
        let block = &doc[start..end];
        if attr_value(opener(block), "class").is_some_and(|c| normalize_ws(&c) == want) {
            return Some(block);
        }
        // step inside: a matching table can sit within a non-matching one
        pos = start + 1;
    }
    None
}

/// Given a complete tag block like `<td ...>INNER</td>`,
/// return INNER without the wrapping tags (may still contain nested tags).
pub fn inner_after_open_tag(block: &str) -> &str {
    if let Some(open_end) = block.find('>') {
        if let Some(close_start) = block.rfind('<') {
            if close_start > open_end {
                return &block[open_end + 1..close_start];
            }
        }
    }
    ""
}

/// Remove all `<...>` tags, then collapse whitespace.
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
    normalize_ws(&out)
}

/// Visible, trimmed text of an element block.
pub fn text_of(block: &str) -> String {
    normalize_ws(&normalize_entities(&strip_tags(inner_after_open_tag(block))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_search_respects_nesting() {
        let doc = "<div><table id=a><tr><td><table id=b></table></td></tr></table><p>x</p></div>";
        let (s, e) = next_element_ci(doc, "table", 0).unwrap();
        assert!(doc[s..e].starts_with("<table id=a>"));
        assert!(doc[s..e].ends_with("</tr></table>"));
    }

    #[test]
    fn tag_names_need_a_boundary() {
        let doc = "<track src=x></track><TR class=r><td>1</td></TR>";
        let rows = elements_ci(doc, "tr");
        assert_eq!(rows.len(), 1);
        assert!(rows[0].starts_with("<TR"));
    }

    #[test]
    fn attr_value_quote_styles() {
        assert_eq!(attr_value(r#"<a href="/x/1" class=y>"#, "href").as_deref(), Some("/x/1"));
        assert_eq!(attr_value("<a href='/x/2'>", "href").as_deref(), Some("/x/2"));
        assert_eq!(attr_value("<a href=/x/3>", "href").as_deref(), Some("/x/3"));
        assert_eq!(attr_value(r#"<a data-href="no">"#, "href"), None);
        assert_eq!(attr_value(r#"<a href="/q?a=1&amp;b=2">"#, "href").as_deref(), Some("/q?a=1&b=2"));
    }

    #[test]
    fn find_by_class_is_exact_on_full_string() {
        let doc = r#"
            <table class="table trade_table"><tr><td>wrong</td></tr></table>
            <table class="table   trade_table  striped"><tr><td>right</td></tr></table>
        "#;
        let t = find_by_class(doc, "table", "table trade_table striped").unwrap();
        assert!(t.contains("right"));
        assert!(find_by_class(doc, "table", "trade_table").is_none());
    }

    #[test]
    fn text_of_strips_and_trims() {
        assert_eq!(text_of("<td>\n  <b>APU</b>&nbsp;JSC \n</td>"), "APU JSC");
        assert_eq!(text_of("<td></td>"), "");
    }
}
