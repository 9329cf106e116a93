//! Rendered Match View
//!
//! What the popup renders: rule blocks in display order with per-declaration
//! winner/overridden flags. Serializes with camelCase field names, matching
//! what the UI host consumes as JSON.

use serde::Serialize;

/// One declaration row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationView {
    /// `None` for inline-style rows, which have no stable handle.
    pub decl_id: Option<u32>,
    pub property: String,
    pub value: String,
    /// A higher-precedence declaration sets the same property; rendered
    /// struck through and not editable.
    pub is_overridden: bool,
    pub is_editable: bool,
}

/// One rule block: selector, source label and declaration rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleBlockView {
    /// `None` for the inline block, which has no stylesheet source.
    pub source_label: Option<String>,
    pub rule_id: Option<u32>,
    pub selector: String,
    pub declarations: Vec<DeclarationView>,
    pub is_inline_block: bool,
}

/// The match engine's answer for one inspected element.
///
/// Blocks are ordered highest specificity first, with the inline block (if
/// any) always first. An element with no matching rules and no inline style
/// gets the explicit no-match state, and an unpopulated database reports
/// `Loading` — neither is an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum MatchedView {
    Loading,
    NoMatchingRules,
    Matched { blocks: Vec<RuleBlockView> },
}
