//! Change Log
//!
//! The set of net edits on top of the harvested baseline. At most one entry
//! per (kind, rule, declaration) key; a later edit to the same field
//! replaces the earlier entry, and an edit that restores the original value
//! deletes the entry outright. Entries keep insertion order for synthesis.
//!
//! Every recording method looks the original up in the rule database first;
//! edits referencing ids the database no longer knows (stale after a
//! re-harvest) are silently dropped.

use peek_css::{DeclId, RuleDatabase, RuleId};

/// One recorded edit. A closed sum: the synthesizer matches exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEntry {
    /// The rule's selector was rewritten.
    SelectorRename { rule: RuleId, selector: String },
    /// A harvested declaration's property name was rewritten.
    PropertyRename {
        rule: RuleId,
        decl: DeclId,
        property: String,
    },
    /// A harvested declaration's value was rewritten.
    ValueChange {
        rule: RuleId,
        decl: DeclId,
        value: String,
    },
    /// A declaration the user added to a rule. `decl` comes from the same
    /// per-rule counter as harvested declarations but has no original to
    /// reference.
    NewDeclaration {
        rule: RuleId,
        decl: DeclId,
        property: String,
        value: String,
    },
}

/// Which field of which rule an entry edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Selector,
    Property,
    Value,
    NewDeclaration,
}

impl ChangeEntry {
    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::SelectorRename { .. } => ChangeKind::Selector,
            Self::PropertyRename { .. } => ChangeKind::Property,
            Self::ValueChange { .. } => ChangeKind::Value,
            Self::NewDeclaration { .. } => ChangeKind::NewDeclaration,
        }
    }

    pub fn rule(&self) -> RuleId {
        match self {
            Self::SelectorRename { rule, .. }
            | Self::PropertyRename { rule, .. }
            | Self::ValueChange { rule, .. }
            | Self::NewDeclaration { rule, .. } => *rule,
        }
    }

    pub fn decl(&self) -> Option<DeclId> {
        match self {
            Self::SelectorRename { .. } => None,
            Self::PropertyRename { decl, .. }
            | Self::ValueChange { decl, .. }
            | Self::NewDeclaration { decl, .. } => Some(*decl),
        }
    }

    fn is(&self, kind: ChangeKind, rule: RuleId, decl: Option<DeclId>) -> bool {
        self.kind() == kind && self.rule() == rule && self.decl() == decl
    }
}

/// Insertion-ordered collection of net edits.
#[derive(Debug, Default)]
pub struct ChangeLog {
    entries: Vec<ChangeEntry>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChangeEntry> {
        self.entries.iter()
    }

    /// Drop every entry. Used when the database is replaced by a re-harvest.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Look up the entry for a (kind, rule, decl) key.
    pub fn find(&self, kind: ChangeKind, rule: RuleId, decl: Option<DeclId>) -> Option<&ChangeEntry> {
        self.entries.iter().find(|e| e.is(kind, rule, decl))
    }

    /// User-added declarations recorded for one rule, in insertion order.
    pub fn new_declarations_for(
        &self,
        rule: RuleId,
    ) -> impl Iterator<Item = (DeclId, &str, &str)> {
        self.entries.iter().filter_map(move |e| match e {
            ChangeEntry::NewDeclaration {
                rule: r,
                decl,
                property,
                value,
            } if *r == rule => Some((*decl, property.as_str(), value.as_str())),
            _ => None,
        })
    }

    /// Record a selector edit.
    pub fn record_selector(&mut self, db: &RuleDatabase, rule: RuleId, new_text: &str) {
        let Some(original) = db.rule(rule).map(|r| r.selector.clone()) else {
            tracing::debug!("selector edit for unknown {}, dropped", rule);
            return;
        };
        self.record_field(ChangeKind::Selector, rule, None, &original, new_text, || {
            ChangeEntry::SelectorRename {
                rule,
                selector: new_text.to_string(),
            }
        });
    }

    /// Record a property-name edit. Ids past the rule's harvested
    /// declarations belong to user-added rows and update those instead.
    pub fn record_property(&mut self, db: &RuleDatabase, rule: RuleId, decl: DeclId, new_text: &str) {
        let Some(rule_ref) = db.rule(rule) else {
            tracing::debug!("property edit for unknown {}, dropped", rule);
            return;
        };
        match rule_ref.declaration(decl) {
            Some(original) => {
                let original = original.property.clone();
                self.record_field(ChangeKind::Property, rule, Some(decl), &original, new_text, || {
                    ChangeEntry::PropertyRename {
                        rule,
                        decl,
                        property: new_text.to_string(),
                    }
                });
            }
            None => self.update_new_declaration_field(rule, decl, Field::Property, new_text),
        }
    }

    /// Record a value edit; same id routing as [`record_property`].
    ///
    /// [`record_property`]: Self::record_property
    pub fn record_value(&mut self, db: &RuleDatabase, rule: RuleId, decl: DeclId, new_text: &str) {
        let Some(rule_ref) = db.rule(rule) else {
            tracing::debug!("value edit for unknown {}, dropped", rule);
            return;
        };
        match rule_ref.declaration(decl) {
            Some(original) => {
                let original = original.value.clone();
                self.record_field(ChangeKind::Value, rule, Some(decl), &original, new_text, || {
                    ChangeEntry::ValueChange {
                        rule,
                        decl,
                        value: new_text.to_string(),
                    }
                });
            }
            None => self.update_new_declaration_field(rule, decl, Field::Value, new_text),
        }
    }

    /// Record a user-added declaration. Both halves must be non-empty after
    /// trimming before the entry is created or updated; a commit with an
    /// empty half leaves any existing entry untouched (only explicit removal
    /// deletes it).
    pub fn record_new_declaration(
        &mut self,
        db: &RuleDatabase,
        rule: RuleId,
        decl: DeclId,
        property: &str,
        value: &str,
    ) {
        let Some(rule_ref) = db.rule(rule) else {
            tracing::debug!("new declaration for unknown {}, dropped", rule);
            return;
        };
        if rule_ref.declaration(decl).is_some() {
            tracing::debug!("new-declaration id {} collides with harvested declaration, dropped", decl);
            return;
        }
        let property = property.trim();
        let value = value.trim();
        if property.is_empty() || value.is_empty() {
            return;
        }

        let key = (ChangeKind::NewDeclaration, rule, Some(decl));
        if let Some(pos) = self.position(key.0, key.1, key.2) {
            self.entries[pos] = ChangeEntry::NewDeclaration {
                rule,
                decl,
                property: property.to_string(),
                value: value.to_string(),
            };
        } else {
            self.entries.push(ChangeEntry::NewDeclaration {
                rule,
                decl,
                property: property.to_string(),
                value: value.to_string(),
            });
        }
    }

    /// Explicitly remove a user-added declaration (row delete in the UI).
    pub fn remove_new_declaration(&mut self, rule: RuleId, decl: DeclId) {
        self.entries
            .retain(|e| !e.is(ChangeKind::NewDeclaration, rule, Some(decl)));
    }

    fn position(&self, kind: ChangeKind, rule: RuleId, decl: Option<DeclId>) -> Option<usize> {
        self.entries.iter().position(|e| e.is(kind, rule, decl))
    }

    /// Shared upsert/prune protocol for the three baseline-referencing edits.
    fn record_field(
        &mut self,
        kind: ChangeKind,
        rule: RuleId,
        decl: Option<DeclId>,
        original: &str,
        new_text: &str,
        make: impl FnOnce() -> ChangeEntry,
    ) {
        let existing = self.position(kind, rule, decl);
        let reverted = new_text == original;

        match (existing, reverted) {
            // Identity edit with nothing recorded: nothing to do.
            (None, true) => {}
            // Reverted to the baseline: the entry disappears entirely.
            (Some(pos), true) => {
                self.entries.remove(pos);
            }
            (Some(pos), false) => set_entry_text(&mut self.entries[pos], new_text),
            (None, false) => self.entries.push(make()),
        }
    }

    /// Update one half of an existing user-added declaration. Creation goes
    /// through [`record_new_declaration`]; an edit arriving for a row that
    /// was never committed is dropped. Empty text is ignored so a cleared
    /// field doesn't wipe the committed entry.
    ///
    /// [`record_new_declaration`]: Self::record_new_declaration
    fn update_new_declaration_field(&mut self, rule: RuleId, decl: DeclId, field: Field, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let Some(pos) = self.position(ChangeKind::NewDeclaration, rule, Some(decl)) else {
            tracing::debug!("edit for uncommitted new declaration {} {}, dropped", rule, decl);
            return;
        };
        if let ChangeEntry::NewDeclaration {
            property, value, ..
        } = &mut self.entries[pos]
        {
            match field {
                Field::Property => *property = text.to_string(),
                Field::Value => *value = text.to_string(),
            }
        }
    }
}

enum Field {
    Property,
    Value,
}

fn set_entry_text(entry: &mut ChangeEntry, text: &str) {
    match entry {
        ChangeEntry::SelectorRename { selector, .. } => *selector = text.to_string(),
        ChangeEntry::PropertyRename { property, .. } => *property = text.to_string(),
        ChangeEntry::ValueChange { value, .. } => *value = text.to_string(),
        // New declarations are updated field-wise, never through here.
        ChangeEntry::NewDeclaration { .. } => {}
    }
}
