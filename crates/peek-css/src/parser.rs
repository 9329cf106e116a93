//! Declaration-Block Parser & Raw-Text Rule Scanner
//!
//! Parses `property: value; ...` blocks the way they were authored, and
//! scans whole-sheet text for `selector { block }` pairs when structured
//! rule access is unavailable. Malformed input is skipped, never an error.

use crate::{DeclId, Declaration};

/// Parse a raw declaration-block string into ordered declarations.
///
/// Split on `;`, find the first `:` in each segment, trim both sides. A
/// segment contributes a declaration only when both halves are non-empty.
/// Ids are assigned 0.. in encounter order and are the stable handles later
/// edits attach to.
pub fn parse_declarations(block: &str) -> Vec<Declaration> {
    let mut decls = Vec::new();
    let mut next_id = 0u32;

    for segment in block.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        let Some(colon) = segment.find(':') else {
            continue;
        };

        let property = segment[..colon].trim();
        let value = segment[colon + 1..].trim();
        if property.is_empty() || value.is_empty() {
            continue;
        }

        decls.push(Declaration {
            id: DeclId(next_id),
            property: property.to_string(),
            value: value.to_string(),
        });
        next_id += 1;
    }

    decls
}

/// A `selector { block }` pair found by the raw-text scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStyleRule {
    pub selector: String,
    pub block: String,
}

/// Scan raw stylesheet text for style rules.
///
/// Fallback extraction for sheets whose structured rule list is
/// access-restricted: repeatedly match text-before-`{` as the selector and
/// text-before-`}` as the block. Selectors starting with `@` (at-rules) or
/// `/` (unterminated comment residue) are skipped. `/* ... */` comments are
/// stripped first so a rule following a comment is still found.
///
/// Not a CSS parser: nested blocks inside at-rules confuse the brace scan,
/// which is an accepted limitation of the fallback path.
pub fn scan_rule_text(text: &str) -> Vec<RawStyleRule> {
    let text = strip_comments(text);
    let bytes = text.as_bytes();
    let mut rules = Vec::new();
    let mut cursor = 0usize;

    loop {
        let Some(open) = find_byte(bytes, cursor, b'{') else {
            break;
        };
        // Selector portion must be non-empty text before the brace.
        if open == cursor {
            cursor = open + 1;
            continue;
        }
        let Some(close) = find_byte(bytes, open + 1, b'}') else {
            break;
        };
        if close == open + 1 {
            cursor = close + 1;
            continue;
        }

        // Only the text after the last stray brace counts as the selector,
        // so the scan recovers after a nested at-rule block.
        let selector = text[cursor..open]
            .rsplit(['{', '}'])
            .next()
            .unwrap_or("")
            .trim();
        let block = &text[open + 1..close];
        cursor = close + 1;

        if selector.is_empty() || selector.starts_with('@') || selector.starts_with('/') {
            continue;
        }

        rules.push(RawStyleRule {
            selector: selector.to_string(),
            block: block.to_string(),
        });
    }

    rules
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes[from.min(bytes.len())..]
        .iter()
        .position(|&b| b == needle)
        .map(|i| from + i)
}

/// Remove `/* ... */` comments. An unterminated comment swallows the rest of
/// the text, matching how browsers treat it.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}
