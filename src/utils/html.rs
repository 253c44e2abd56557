// src/utils/html.rs

//! Non-validating HTML scanning helpers.
//!
//! These do not build a DOM. They find `<tag ...>...</tag>` blocks by plain
//! string search (ASCII case-insensitive on tag names), take the first closing
//! tag after an opening one, and never fail: malformed or truncated markup
//! simply yields fewer blocks.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("line break pattern"));
static SPAN_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<span\b[^>]*>").expect("span open pattern"));
static SPAN_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</\s*span\s*> *").expect("span close pattern"));

/// Return the inner text of every `<tag ...>...</tag>` block, in document order.
///
/// Blocks do not nest: an inner opening tag of the same name is treated as
/// content and the block ends at the first matching closing tag.
pub fn tag_blocks<'a>(s: &'a str, tag: &str) -> Vec<&'a str> {
    // ASCII lowercasing keeps byte offsets identical to `s`
    let lower = s.to_ascii_lowercase();
    let tag = tag.to_ascii_lowercase();

    let mut blocks = Vec::new();
    let mut pos = 0;
    while let Some(start) = find_open_tag(&lower, &tag, pos) {
        let Some(open_end) = lower[start..].find('>').map(|i| start + i + 1) else {
            break;
        };
        let Some((close_start, close_end)) = find_close_tag(&lower, &tag, open_end) else {
            break;
        };
        blocks.push(&s[open_end..close_start]);
        pos = close_end;
    }
    blocks
}

/// Find `<tag` followed by `>`, `/` or whitespace, so `<tr` does not match `<track`.
fn find_open_tag(lower: &str, tag: &str, from: usize) -> Option<usize> {
    let needle = format!("<{tag}");
    let bytes = lower.as_bytes();
    let mut pos = from;
    while let Some(rel) = lower.get(pos..)?.find(&needle) {
        let start = pos + rel;
        let after = start + needle.len();
        match bytes.get(after) {
            Some(b'>' | b'/') => return Some(start),
            Some(b) if b.is_ascii_whitespace() => return Some(start),
            None => return None,
            _ => pos = after,
        }
    }
    None
}

/// Find `</ tag >` with optional spaces around the name. Returns (start, end).
fn find_close_tag(lower: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let bytes = lower.as_bytes();
    let mut pos = from;
    while let Some(rel) = lower.get(pos..)?.find("</") {
        let start = pos + rel;
        let mut i = start + 2;
        while bytes.get(i) == Some(&b' ') {
            i += 1;
        }
        if lower.get(i..).is_some_and(|rest| rest.starts_with(tag)) {
            let mut j = i + tag.len();
            while bytes.get(j) == Some(&b' ') {
                j += 1;
            }
            if bytes.get(j) == Some(&b'>') {
                return Some((start, j + 1));
            }
        }
        pos = start + 2;
    }
    None
}

/// Flatten a table row onto one line.
///
/// Non-breaking spaces become spaces, newlines and `<br>` tags are dropped,
/// runs of spaces collapse to one, and spaces between adjacent tags or at
/// either end disappear.
pub fn normalize_row(row: &str) -> String {
    let flat = row.replace('\u{a0}', " ").replace(['\n', '\r'], "");
    let flat = LINE_BREAK.replace_all(&flat, "");

    let mut out = String::with_capacity(flat.len());
    let mut pending_space = false;
    for ch in flat.chars() {
        if ch == ' ' {
            pending_space = true;
            continue;
        }
        if pending_space {
            let between_tags = ch == '<' && out.ends_with('>');
            if !out.is_empty() && !between_tags {
                out.push(' ');
            }
            pending_space = false;
        }
        out.push(ch);
    }
    out
}

/// Remove `<span ...>` and `</span>` wrappers while keeping their content.
///
/// When opening and closing tags are unbalanced the cell is returned
/// untouched.
pub fn strip_spans(cell: &str) -> Cow<'_, str> {
    let opens = SPAN_OPEN.find_iter(cell).count();
    let closes = SPAN_CLOSE.find_iter(cell).count();
    if opens != closes || opens == 0 {
        return Cow::Borrowed(cell);
    }

    let without_open = SPAN_OPEN.replace_all(cell, "");
    Cow::Owned(SPAN_CLOSE.replace_all(&without_open, "").into_owned())
}

/// Drop literal `\t` and `\n` escape sequences left in the markup.
pub fn strip_escape_artifacts(cell: &str) -> String {
    cell.replace("\\t", "").replace("\\n", "")
}

/// Value of the first `name="..."` (or `name='...'`) attribute in `s`.
pub fn attr_value<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    let lower = s.to_ascii_lowercase();
    let needle = format!("{}=", name.to_ascii_lowercase());

    let mut pos = 0;
    while let Some(rel) = lower.get(pos..)?.find(&needle) {
        let start = pos + rel;
        pos = start + needle.len();

        // Require an attribute boundary so `ref` does not match `data-ref`
        let boundary = start == 0
            || matches!(lower.as_bytes()[start - 1], b'"' | b'\'')
            || lower.as_bytes()[start - 1].is_ascii_whitespace();
        if !boundary {
            continue;
        }

        let quote = match s.as_bytes().get(pos) {
            Some(q @ (b'"' | b'\'')) => *q as char,
            _ => continue,
        };
        let value_start = pos + 1;
        let value_len = s[value_start..].find(quote)?;
        return Some(&s[value_start..value_start + value_len]);
    }
    None
}
