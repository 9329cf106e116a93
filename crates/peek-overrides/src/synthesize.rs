//! Override Stylesheet Synthesis
//!
//! Rebuilds the override CSS text from scratch on every call: a pure
//! function of (rule database, change log), so repeated synthesis is
//! byte-identical and there is no drift from incremental patching. The host
//! injects the text into a late `<style>` element with the well-known id;
//! every declaration additionally carries `!important` so the override wins
//! against author styles regardless of selector specificity.

use crate::changelog::{ChangeEntry, ChangeKind, ChangeLog};
use peek_css::RuleDatabase;

/// Id of the page-level `<style>` element the synthesized text is injected
/// into, so it can be located and replaced idempotently on each update.
pub const OVERRIDE_STYLE_ELEMENT_ID: &str = "css-editor-overrides";

/// Synthesize the override stylesheet text for the current change log.
///
/// Entries are emitted in insertion order, one block per entry:
/// - a selector rename re-emits the *entire original* declaration set under
///   the new selector;
/// - a property rename emits the new name paired with the pending value
///   change for the same declaration if one exists, else the original value;
/// - a value change is skipped when a property rename for the same
///   declaration exists (already emitted combined), else emits the original
///   property with the new value;
/// - a new declaration emits only when both halves are non-empty.
///
/// Entries referencing rules or declarations the database no longer has are
/// skipped.
pub fn synthesize(db: &RuleDatabase, log: &ChangeLog) -> String {
    let mut css = String::new();

    for entry in log.iter() {
        let Some(rule) = db.rule(entry.rule()) else {
            tracing::debug!("{} vanished from database, entry skipped", entry.rule());
            continue;
        };

        match entry {
            ChangeEntry::SelectorRename { selector, .. } => {
                let decls: Vec<(&str, &str)> = rule
                    .declarations
                    .iter()
                    .map(|d| (d.property.as_str(), d.value.as_str()))
                    .collect();
                push_block(&mut css, selector, &decls);
            }
            ChangeEntry::PropertyRename {
                rule: rule_id,
                decl,
                property,
            } => {
                let Some(original) = rule.declaration(*decl) else {
                    continue;
                };
                let value = match log.find(ChangeKind::Value, *rule_id, Some(*decl)) {
                    Some(ChangeEntry::ValueChange { value, .. }) => value.as_str(),
                    _ => original.value.as_str(),
                };
                push_block(&mut css, &rule.selector, &[(property.as_str(), value)]);
            }
            ChangeEntry::ValueChange {
                rule: rule_id,
                decl,
                value,
            } => {
                // Emitted together with the rename when one is pending.
                if log.find(ChangeKind::Property, *rule_id, Some(*decl)).is_some() {
                    continue;
                }
                let Some(original) = rule.declaration(*decl) else {
                    continue;
                };
                push_block(
                    &mut css,
                    &rule.selector,
                    &[(original.property.as_str(), value.as_str())],
                );
            }
            ChangeEntry::NewDeclaration {
                property, value, ..
            } => {
                if property.is_empty() || value.is_empty() {
                    continue;
                }
                push_block(
                    &mut css,
                    &rule.selector,
                    &[(property.as_str(), value.as_str())],
                );
            }
        }
    }

    css
}

fn push_block(out: &mut String, selector: &str, decls: &[(&str, &str)]) {
    if decls.is_empty() {
        return;
    }
    out.push_str(selector);
    out.push_str(" {\n");
    for (property, value) in decls {
        out.push_str("  ");
        out.push_str(property);
        out.push_str(": ");
        out.push_str(value);
        out.push_str(" !important;\n");
    }
    out.push_str("}\n");
}
