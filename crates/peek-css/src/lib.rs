//! peek CSS rule model
//!
//! The harvested rule database plus the core algorithms over it:
//! declaration parsing, raw-text rule scanning, specificity scoring and
//! selector matching.

mod parser;
mod selectors;
mod specificity;

pub use parser::{parse_declarations, scan_rule_text, RawStyleRule};
pub use selectors::{element_matches, parse_selector_list, SelectorError, SelectorList};
pub use specificity::specificity;

use std::fmt;

/// Identifier of a harvested rule, unique across the whole harvest and
/// monotonically increasing in harvest order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub u32);

/// Identifier of a declaration within one rule.
///
/// Harvested declarations take consecutive ids from 0 in authored order.
/// Declarations the user adds later continue the same per-rule counter, so
/// an id is unique within its rule across both kinds;
/// [`Rule::declaration`] returning `None` marks the id as user-added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub u32);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule#{}", self.0)
    }
}

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decl#{}", self.0)
    }
}

/// One `property: value` pair as authored. Immutable; user edits live in the
/// change log, never here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub id: DeclId,
    pub property: String,
    pub value: String,
}

/// One selector plus its original declaration block, from one stylesheet.
/// Immutable after harvest.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: RuleId,
    pub selector: String,
    /// Authored order, preserved for rendering and "add after last".
    pub declarations: Vec<Declaration>,
    /// Human-readable source label (filename, "inline", "unknown").
    pub origin: String,
    pub specificity: u32,
}

impl Rule {
    /// Look up a harvested declaration by id. `None` for ids allocated to
    /// user-added declarations.
    pub fn declaration(&self, id: DeclId) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.id == id)
    }

    /// First id past the harvested declarations; user-added declarations
    /// for this rule are numbered from here.
    pub fn next_decl_id(&self) -> DeclId {
        DeclId(self.declarations.len() as u32)
    }
}

/// Harvest generation token. A re-harvest bumps the generation; databases
/// tagged with a superseded generation are discarded at install time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Generation(pub u64);

/// The harvested rule set: an ordered sequence of rules, append-only during
/// harvest and never mutated afterward. Rebuilt wholesale by re-harvesting.
#[derive(Debug, Default)]
pub struct RuleDatabase {
    rules: Vec<Rule>,
    generation: Generation,
}

impl RuleDatabase {
    pub fn new(generation: Generation) -> Self {
        Self {
            rules: Vec::new(),
            generation,
        }
    }

    /// Append a rule during harvest.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// All rules in harvest order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Look up a rule by id.
    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
