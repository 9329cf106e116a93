//! Rule Harvester
//!
//! Builds the rule database from the document's stylesheet list. Two
//! extraction strategies per sheet: the structured rule list when readable,
//! and fetch-the-raw-text-and-scan when access is restricted. A failed
//! fallback logs and skips the sheet; a partial database is an accepted
//! outcome.

use crate::fetch::SheetFetcher;
use crate::source::sheet_source;
use peek_css::{
    parse_declarations, scan_rule_text, specificity, Generation, Rule, RuleDatabase, RuleId,
};
use peek_dom::{RawRule, SheetAccess, SheetHandle};

/// Harvest every style rule reachable from `sheets` into a fresh database
/// tagged with `generation`.
///
/// Rule ids are global and monotonic across all sheets in harvest order, so
/// change-log references stay unambiguous for the database's lifetime.
pub async fn harvest<F: SheetFetcher>(
    sheets: &[SheetHandle],
    fetcher: &F,
    generation: Generation,
) -> RuleDatabase {
    let mut db = RuleDatabase::new(generation);
    let mut next_id = 0u32;

    for sheet in sheets {
        let origin = sheet_source(sheet);

        match &sheet.access {
            SheetAccess::Structured(rules) => {
                for raw in rules {
                    // Only plain style rules; at-rules, media blocks and
                    // keyframes are not part of the direct-match model.
                    if let RawRule::Style { selector, block } = raw {
                        db.push(make_rule(&mut next_id, selector, block, &origin));
                    }
                }
            }
            SheetAccess::Restricted => {
                let Some(href) = &sheet.href else {
                    tracing::debug!("restricted sheet without href, skipping");
                    continue;
                };
                match fetcher.fetch_text(href).await {
                    Ok(text) => {
                        for raw in scan_rule_text(&text) {
                            db.push(make_rule(&mut next_id, &raw.selector, &raw.block, &origin));
                        }
                    }
                    Err(err) => {
                        tracing::warn!("skipped stylesheet {}: {}", href, err);
                    }
                }
            }
        }
    }

    tracing::info!(
        "harvest complete: {} rules from {} sheets (generation {})",
        db.len(),
        sheets.len(),
        generation.0
    );
    db
}

fn make_rule(next_id: &mut u32, selector: &str, block: &str, origin: &str) -> Rule {
    let id = RuleId(*next_id);
    *next_id += 1;
    Rule {
        id,
        selector: selector.to_string(),
        declarations: parse_declarations(block),
        origin: origin.to_string(),
        specificity: specificity(selector),
    }
}
