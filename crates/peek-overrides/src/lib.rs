//! peek override engine
//!
//! Records user edits as a change log of net differences against the
//! harvested baseline, and synthesizes the single override stylesheet that
//! makes those edits visible on the live page.

mod changelog;
mod synthesize;

pub use changelog::{ChangeEntry, ChangeKind, ChangeLog};
pub use synthesize::{synthesize, OVERRIDE_STYLE_ELEMENT_ID};
