//! Specificity Heuristic
//!
//! Integer cascade-priority score for a selector: ids count 100, classes 10,
//! type tokens 1. `:not(...)` arguments are spliced out of the parentheses
//! so their tokens count at the top level, as the cascade does for negation.
//!
//! Known approximation carried from the original tool: attribute selectors
//! and pseudo-elements are under/over-counted by the `#`/`.`/token scan.
//! Good enough for ranking matched rules; not a spec-accurate calculator.

/// Compute the specificity score for a selector string.
pub fn specificity(selector: &str) -> u32 {
    let neutral = neutralize_not(selector);
    let mut score = 0u32;

    for ch in neutral.chars() {
        match ch {
            '#' => score += 100,
            '.' => score += 10,
            _ => {}
        }
    }

    // Alphanumeric runs anchored at the start or after whitespace count as
    // type tokens. `#id` and `.class` names don't, since they follow a
    // sigil rather than whitespace.
    let mut prev: Option<char> = None;
    for ch in neutral.chars() {
        if ch.is_ascii_alphanumeric() {
            let anchored = match prev {
                None => true,
                Some(p) => p.is_whitespace(),
            };
            if anchored {
                score += 1;
            }
        }
        prev = Some(ch);
    }

    score
}

/// Replace every `:not(arg)` with ` arg ` so the argument's tokens are
/// scored like top-level tokens.
fn neutralize_not(selector: &str) -> String {
    let mut out = String::with_capacity(selector.len());
    let mut rest = selector;

    while let Some(start) = rest.find(":not(") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 5..];
        match after.find(')') {
            Some(close) => {
                out.push(' ');
                out.push_str(&after[..close]);
                out.push(' ');
                rest = &after[close + 1..];
            }
            None => {
                // Unclosed :not( — leave the tail as-is.
                out.push_str(&rest[start..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}
