//! Match Engine
//!
//! Filters the rule database to rules matching an element, decides the
//! winning declaration per property under cascade order, and assembles the
//! display-ordered view.

use crate::view::{DeclarationView, MatchedView, RuleBlockView};
use peek_css::{element_matches, parse_declarations, Rule, RuleDatabase};
use peek_dom::ElementPath;
use peek_overrides::ChangeLog;
use std::collections::HashMap;

/// Selector label shown for the inline-style block.
pub(crate) const INLINE_SELECTOR: &str = "element.style";

/// Who wins a property: a matched rule (by sorted index) or the element's
/// inline style, which outranks any stylesheet specificity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Winner {
    Sheet(usize),
    Inline,
}

pub(crate) fn matched_view(
    db: &RuleDatabase,
    log: &ChangeLog,
    path: &ElementPath,
) -> MatchedView {
    // Selector-match failures make a rule non-matching, never an error.
    let mut matched: Vec<&Rule> = db
        .rules()
        .iter()
        .filter(|rule| element_matches(&rule.selector, path))
        .collect();

    // Ascending specificity; the stable sort keeps harvest order for ties,
    // so later sheets win ties like the cascade does.
    matched.sort_by_key(|rule| rule.specificity);

    let inline_decls = parse_declarations(&path.target().inline_style);

    // Walk low-to-high: the last writer of each property wins. Inline
    // properties then trump everything.
    let mut winners: HashMap<&str, Winner> = HashMap::new();
    for (index, rule) in matched.iter().enumerate() {
        for decl in &rule.declarations {
            winners.insert(decl.property.as_str(), Winner::Sheet(index));
        }
    }
    for decl in &inline_decls {
        winners.insert(decl.property.as_str(), Winner::Inline);
    }

    let mut blocks = Vec::new();

    if !inline_decls.is_empty() {
        blocks.push(RuleBlockView {
            source_label: None,
            rule_id: None,
            selector: INLINE_SELECTOR.to_string(),
            declarations: inline_decls
                .iter()
                .map(|decl| DeclarationView {
                    decl_id: None,
                    property: decl.property.clone(),
                    value: decl.value.clone(),
                    is_overridden: false,
                    is_editable: false,
                })
                .collect(),
            is_inline_block: true,
        });
    }

    // Display order is highest specificity first, devtools style.
    for (index, rule) in matched.iter().enumerate().rev() {
        let mut declarations: Vec<DeclarationView> = rule
            .declarations
            .iter()
            .map(|decl| {
                let overridden =
                    winners.get(decl.property.as_str()) != Some(&Winner::Sheet(index));
                DeclarationView {
                    decl_id: Some(decl.id.0),
                    property: decl.property.clone(),
                    value: decl.value.clone(),
                    is_overridden: overridden,
                    is_editable: !overridden,
                }
            })
            .collect();

        // Rows the user added to this rule re-render after a re-open.
        for (decl_id, property, value) in log.new_declarations_for(rule.id) {
            declarations.push(DeclarationView {
                decl_id: Some(decl_id.0),
                property: property.to_string(),
                value: value.to_string(),
                is_overridden: false,
                is_editable: true,
            });
        }

        if declarations.is_empty() {
            continue;
        }
        blocks.push(RuleBlockView {
            source_label: Some(rule.origin.clone()),
            rule_id: Some(rule.id.0),
            selector: rule.selector.clone(),
            declarations,
            is_inline_block: false,
        });
    }

    if blocks.is_empty() {
        MatchedView::NoMatchingRules
    } else {
        MatchedView::Matched { blocks }
    }
}
