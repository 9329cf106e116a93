//! peek page snapshot model
//!
//! The shapes the host (content script / embedder) hands over when the
//! inspector runs: the element under the cursor with its ancestor chain,
//! and the document's stylesheets as opaque handles.

mod element;
mod sheet;

pub use element::{Element, ElementPath};
pub use sheet::{RawRule, SheetAccess, SheetHandle, SheetOwner};
