//! peek inspector engine
//!
//! The session object the UI host talks to: it owns the harvested rule
//! database and the change log, computes the cascade-ordered match view for
//! an inspected element, funnels debounced and immediate edit commits
//! through one path, and keeps the derived override stylesheet text current.

mod cascade;
mod debounce;
mod session;
mod view;

pub use debounce::{CommitFunnel, CommitRequest, DEFAULT_QUIET_PERIOD};
pub use session::{EditField, Session};
pub use view::{DeclarationView, MatchedView, RuleBlockView};

pub use peek_overrides::OVERRIDE_STYLE_ELEMENT_ID;
