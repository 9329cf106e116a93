//! Stylesheet Handles
//!
//! One entry of the document's stylesheet list, as the host exposes it.
//! Structured rule access mirrors `sheet.cssRules`; cross-origin sheets
//! surface as `Restricted` and are harvested from their raw text instead.

/// What kind of node produced the stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetOwner {
    /// In-document `<style>` element
    StyleElement,
    /// `<link rel="stylesheet">`
    LinkElement,
    /// Anything else (constructed sheets, unknown owners)
    Other,
}

/// A rule as enumerated from a sheet's structured rule list.
///
/// Only `Style` rules are harvested; the other variants exist so the host
/// can hand the list over losslessly and the harvester can skip them.
#[derive(Debug, Clone)]
pub enum RawRule {
    /// Plain style rule: selector text plus declaration-block text.
    Style { selector: String, block: String },
    /// `@media` block (raw text)
    Media(String),
    /// `@keyframes` block (raw text)
    Keyframes(String),
    /// `@import`
    Import(String),
    /// Any other at-rule or unrecognized rule
    Other(String),
}

/// Rule access for one sheet.
#[derive(Debug, Clone)]
pub enum SheetAccess {
    /// Rule list is readable.
    Structured(Vec<RawRule>),
    /// Access throws (cross-origin); the sheet must be fetched as text.
    Restricted,
}

/// A stylesheet handle: where it came from and how its rules can be read.
#[derive(Debug, Clone)]
pub struct SheetHandle {
    /// URL for linked sheets; `None` for `<style>` elements.
    pub href: Option<String>,
    pub owner: SheetOwner,
    pub access: SheetAccess,
}

impl SheetHandle {
    /// An in-document `<style>` sheet.
    pub fn inline(rules: Vec<RawRule>) -> Self {
        Self {
            href: None,
            owner: SheetOwner::StyleElement,
            access: SheetAccess::Structured(rules),
        }
    }

    /// A linked sheet whose rule list is readable.
    pub fn linked(href: &str, rules: Vec<RawRule>) -> Self {
        Self {
            href: Some(href.to_string()),
            owner: SheetOwner::LinkElement,
            access: SheetAccess::Structured(rules),
        }
    }

    /// A linked sheet whose rule list access throws (cross-origin).
    pub fn restricted(href: &str) -> Self {
        Self {
            href: Some(href.to_string()),
            owner: SheetOwner::LinkElement,
            access: SheetAccess::Restricted,
        }
    }
}

impl RawRule {
    /// Convenience constructor for style rules.
    pub fn style(selector: &str, block: &str) -> Self {
        Self::Style {
            selector: selector.to_string(),
            block: block.to_string(),
        }
    }
}
