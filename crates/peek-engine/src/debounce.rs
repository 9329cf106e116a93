//! Commit Funnel
//!
//! Edits arrive as keystrokes (commit after a quiet period) or as blur
//! events (commit immediately). Both paths funnel through the same apply
//! step, and an immediate commit cancels any pending debounced commit for
//! the same field so the stale text can never land after the fresh one.

use crate::session::{EditField, Session};
use peek_css::{DeclId, RuleId};
use std::time::{Duration, Instant};

/// Quiet period before a keystroke-driven edit commits.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// One edit waiting to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitRequest {
    /// Selector, property or value text for an existing field.
    Field {
        rule: RuleId,
        decl: Option<DeclId>,
        field: EditField,
        text: String,
    },
    /// Both halves of a user-added declaration row.
    NewDeclaration {
        rule: RuleId,
        decl: DeclId,
        property: String,
        value: String,
    },
}

/// Field identity, ignoring text. Requests with equal keys supersede each
/// other in the funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CommitKey {
    rule: RuleId,
    decl: Option<DeclId>,
    slot: Slot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Selector,
    Property,
    Value,
    NewDeclaration,
}

impl CommitRequest {
    fn key(&self) -> CommitKey {
        match self {
            Self::Field { rule, decl, field, .. } => CommitKey {
                rule: *rule,
                decl: *decl,
                slot: match field {
                    EditField::Selector => Slot::Selector,
                    EditField::Property => Slot::Property,
                    EditField::Value => Slot::Value,
                },
            },
            Self::NewDeclaration { rule, decl, .. } => CommitKey {
                rule: *rule,
                decl: Some(*decl),
                slot: Slot::NewDeclaration,
            },
        }
    }

    fn apply(self, session: &mut Session) {
        match self {
            Self::Field { rule, decl, field, text } => {
                session.commit_field(rule, decl, field, &text);
            }
            Self::NewDeclaration { rule, decl, property, value } => {
                session.commit_new_declaration(rule, decl, &property, &value);
            }
        }
    }
}

/// The single commit path for keystroke and blur edits.
#[derive(Debug)]
pub struct CommitFunnel {
    pending: Vec<(Instant, CommitRequest)>,
    quiet: Duration,
}

impl Default for CommitFunnel {
    fn default() -> Self {
        Self::new()
    }
}

impl CommitFunnel {
    pub fn new() -> Self {
        Self::with_quiet_period(DEFAULT_QUIET_PERIOD)
    }

    pub fn with_quiet_period(quiet: Duration) -> Self {
        Self {
            pending: Vec::new(),
            quiet,
        }
    }

    /// Queue a keystroke-driven edit. A pending request for the same field
    /// is replaced and its timer restarts.
    pub fn debounce(&mut self, request: CommitRequest, now: Instant) {
        let key = request.key();
        self.pending.retain(|(_, r)| r.key() != key);
        self.pending.push((now + self.quiet, request));
    }

    /// Commit every request whose quiet period has elapsed, in queue order.
    /// Returns how many committed.
    pub fn fire_due(&mut self, now: Instant, session: &mut Session) -> usize {
        let mut fired = 0;
        for (deadline, request) in std::mem::take(&mut self.pending) {
            if deadline <= now {
                request.apply(session);
                fired += 1;
            } else {
                self.pending.push((deadline, request));
            }
        }
        fired
    }

    /// Commit a blur-driven edit right now, cancelling any pending
    /// debounced request for the same field.
    pub fn commit_now(&mut self, request: CommitRequest, session: &mut Session) {
        let key = request.key();
        self.pending.retain(|(_, r)| r.key() != key);
        request.apply(session);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peek_css::{Generation, Rule, RuleDatabase, RuleId};

    fn session_with_rule() -> Session {
        let mut session = Session::new();
        let generation = session.begin_harvest();
        let mut db = RuleDatabase::new(generation);
        db.push(Rule {
            id: RuleId(0),
            selector: ".card".to_string(),
            declarations: peek_css::parse_declarations("color: red"),
            origin: "app.css".to_string(),
            specificity: 10,
        });
        assert!(session.install_database(db));
        session
    }

    fn value_edit(text: &str) -> CommitRequest {
        CommitRequest::Field {
            rule: RuleId(0),
            decl: Some(DeclId(0)),
            field: EditField::Value,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_same_field_replaces_pending() {
        let mut funnel = CommitFunnel::new();
        let now = Instant::now();

        funnel.debounce(value_edit("b"), now);
        funnel.debounce(value_edit("bl"), now);
        funnel.debounce(value_edit("blue"), now);
        assert_eq!(funnel.pending(), 1);

        // A different field queues independently.
        funnel.debounce(
            CommitRequest::Field {
                rule: RuleId(0),
                decl: None,
                field: EditField::Selector,
                text: ".card-v2".to_string(),
            },
            now,
        );
        assert_eq!(funnel.pending(), 2);
    }

    #[test]
    fn test_fires_only_after_quiet_period() {
        let mut session = session_with_rule();
        let mut funnel = CommitFunnel::with_quiet_period(Duration::from_millis(300));
        let now = Instant::now();

        funnel.debounce(value_edit("blue"), now);
        assert_eq!(funnel.fire_due(now + Duration::from_millis(299), &mut session), 0);
        assert_eq!(session.change_count(), 0);

        assert_eq!(funnel.fire_due(now + Duration::from_millis(300), &mut session), 1);
        assert_eq!(session.change_count(), 1);
        assert_eq!(funnel.pending(), 0);
        assert!(session.override_style_text().contains("color: blue !important"));
    }

    #[test]
    fn test_retype_restarts_timer() {
        let mut session = session_with_rule();
        let mut funnel = CommitFunnel::with_quiet_period(Duration::from_millis(300));
        let now = Instant::now();

        funnel.debounce(value_edit("blu"), now);
        funnel.debounce(value_edit("blue"), now + Duration::from_millis(200));

        // 300ms after the first keystroke, only 100ms after the second.
        assert_eq!(funnel.fire_due(now + Duration::from_millis(300), &mut session), 0);
        assert_eq!(funnel.fire_due(now + Duration::from_millis(500), &mut session), 1);
        assert!(session.override_style_text().contains("blue"));
    }

    #[test]
    fn test_blur_commits_immediately_and_cancels_pending() {
        let mut session = session_with_rule();
        let mut funnel = CommitFunnel::new();
        let now = Instant::now();

        funnel.debounce(value_edit("stale"), now);
        funnel.commit_now(value_edit("blue"), &mut session);

        assert_eq!(funnel.pending(), 0);
        assert!(session.override_style_text().contains("blue"));

        // The cancelled keystroke text never lands.
        funnel.fire_due(now + Duration::from_secs(1), &mut session);
        assert!(!session.override_style_text().contains("stale"));
    }

    #[test]
    fn test_new_declaration_request_funnels() {
        let mut session = session_with_rule();
        let mut funnel = CommitFunnel::new();
        let decl = session.add_declaration(RuleId(0)).unwrap();

        funnel.commit_now(
            CommitRequest::NewDeclaration {
                rule: RuleId(0),
                decl,
                property: "opacity".to_string(),
                value: "0.5".to_string(),
            },
            &mut session,
        );

        assert!(session.override_style_text().contains("opacity: 0.5 !important"));
    }
}
