//! Inspector Session
//!
//! One session per inspected page instance. Owns the rule database and the
//! change log (no ambient globals), hands out harvest generations so a
//! superseded harvest can't clobber a newer one, and keeps the derived
//! override stylesheet text in step with every recorded edit.

use crate::cascade;
use crate::view::MatchedView;
use peek_css::{DeclId, Generation, RuleDatabase, RuleId};
use peek_dom::{ElementPath, SheetHandle};
use peek_harvest::SheetFetcher;
use peek_overrides::{synthesize, ChangeLog};
use std::collections::HashMap;

/// Which editable field of a rule block a commit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditField {
    Selector,
    Property,
    Value,
}

/// Inspector session state.
#[derive(Debug, Default)]
pub struct Session {
    /// `None` until the first harvest lands: the "loading" state.
    database: Option<RuleDatabase>,
    changes: ChangeLog,
    override_text: String,
    /// Highest generation handed out; only a database tagged with it may
    /// install.
    issued_generation: u64,
    /// Per-rule allocator for user-added declaration ids, continuing each
    /// rule's harvested counter.
    new_decl_counters: HashMap<RuleId, u32>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a harvest and get its generation token.
    pub fn begin_harvest(&mut self) -> Generation {
        self.issued_generation += 1;
        Generation(self.issued_generation)
    }

    /// Install a harvested database. A database from a superseded harvest
    /// is discarded (a newer harvest owns the session now). Installing
    /// resets the change log, the new-declaration counters and the override
    /// text: edits never survive across databases.
    pub fn install_database(&mut self, db: RuleDatabase) -> bool {
        if db.generation().0 != self.issued_generation {
            tracing::warn!(
                "discarding stale harvest (generation {}, current {})",
                db.generation().0,
                self.issued_generation
            );
            return false;
        }
        tracing::info!("database installed: {} rules", db.len());
        self.database = Some(db);
        self.changes.clear();
        self.new_decl_counters.clear();
        self.override_text.clear();
        true
    }

    /// Harvest `sheets` and install the result. Convenience for
    /// [`begin_harvest`] + [`peek_harvest::harvest`] + [`install_database`].
    ///
    /// [`begin_harvest`]: Self::begin_harvest
    /// [`install_database`]: Self::install_database
    pub async fn harvest<F: SheetFetcher>(&mut self, sheets: &[SheetHandle], fetcher: &F) -> bool {
        let generation = self.begin_harvest();
        let db = peek_harvest::harvest(sheets, fetcher, generation).await;
        self.install_database(db)
    }

    /// Read-only database snapshot; `None` while loading.
    pub fn database(&self) -> Option<&RuleDatabase> {
        self.database.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.database.is_none()
    }

    /// Compute the cascade-ordered view for the inspected element.
    pub fn matched_view(&self, path: &ElementPath) -> MatchedView {
        match &self.database {
            None => MatchedView::Loading,
            Some(db) => cascade::matched_view(db, &self.changes, path),
        }
    }

    /// Commit an edited field (debounced tick or blur, both end up here)
    /// and rebuild the override text.
    pub fn commit_field(&mut self, rule: RuleId, decl: Option<DeclId>, field: EditField, text: &str) {
        let Some(db) = &self.database else {
            tracing::debug!("edit before database load, dropped");
            return;
        };
        match (field, decl) {
            (EditField::Selector, _) => self.changes.record_selector(db, rule, text),
            (EditField::Property, Some(decl)) => self.changes.record_property(db, rule, decl, text),
            (EditField::Value, Some(decl)) => self.changes.record_value(db, rule, decl, text),
            (EditField::Property | EditField::Value, None) => {
                tracing::debug!("{:?} edit without declaration id, dropped", field);
            }
        }
        self.resynthesize();
    }

    /// Allocate the next declaration id for a user-added row on `rule`,
    /// from the same id space as the rule's harvested declarations.
    pub fn add_declaration(&mut self, rule: RuleId) -> Option<DeclId> {
        let db = self.database.as_ref()?;
        let rule_ref = db.rule(rule)?;
        let counter = self
            .new_decl_counters
            .entry(rule)
            .or_insert(rule_ref.next_decl_id().0);
        let id = DeclId(*counter);
        *counter += 1;
        Some(id)
    }

    /// Commit a user-added declaration row (both halves required).
    pub fn commit_new_declaration(
        &mut self,
        rule: RuleId,
        decl: DeclId,
        property: &str,
        value: &str,
    ) {
        let Some(db) = &self.database else {
            tracing::debug!("edit before database load, dropped");
            return;
        };
        self.changes
            .record_new_declaration(db, rule, decl, property, value);
        self.resynthesize();
    }

    /// Remove a user-added declaration row (the UI's row delete).
    pub fn remove_new_declaration(&mut self, rule: RuleId, decl: DeclId) {
        self.changes.remove_new_declaration(rule, decl);
        self.resynthesize();
    }

    /// The synthesized override stylesheet text, current as of the last
    /// commit. Inject into the `<style>` element with id
    /// [`OVERRIDE_STYLE_ELEMENT_ID`](peek_overrides::OVERRIDE_STYLE_ELEMENT_ID).
    pub fn override_style_text(&self) -> &str {
        &self.override_text
    }

    /// Net edits currently recorded. Mainly for diagnostics and tests.
    pub fn change_count(&self) -> usize {
        self.changes.len()
    }

    fn resynthesize(&mut self) {
        self.override_text = match &self.database {
            Some(db) => synthesize(db, &self.changes),
            None => String::new(),
        };
    }
}
