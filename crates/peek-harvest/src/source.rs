//! Stylesheet Source Resolver
//!
//! Best-effort human-readable origin label for a sheet. Never fails.

use peek_dom::{SheetHandle, SheetOwner};
use url::Url;

/// Derive the origin label for a stylesheet handle.
///
/// Linked sheets resolve to the final path segment of their URL (the raw
/// href when the URL doesn't parse or has no usable segment), `<style>`
/// sheets to `"inline"`, anything else to `"unknown"`.
pub fn sheet_source(sheet: &SheetHandle) -> String {
    if let Some(href) = &sheet.href {
        return match Url::parse(href) {
            Ok(url) => url
                .path_segments()
                .and_then(|segments| segments.last())
                .filter(|segment| !segment.is_empty())
                .map(|segment| segment.to_string())
                .unwrap_or_else(|| href.clone()),
            Err(_) => href.clone(),
        };
    }
    if sheet.owner == SheetOwner::StyleElement {
        return "inline".to_string();
    }
    "unknown".to_string()
}
