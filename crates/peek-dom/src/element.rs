//! Element Snapshot
//!
//! A static view of one page element, plus the ancestor chain needed for
//! combinator matching.

use std::collections::HashMap;

/// Snapshot of a single element: tag, id, classes, attributes and the raw
/// `style=""` attribute text.
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag_name: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: HashMap<String, String>,
    /// Raw inline style attribute text, unparsed.
    pub inline_style: String,
}

impl Element {
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_lowercase(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_inline_style(mut self, style: &str) -> Self {
        self.inline_style = style.to_string();
        self
    }

    /// Check class membership
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Get attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|v| v.as_str())
    }
}

/// An element plus its ancestors, root first, target last.
///
/// Selector matching walks this chain for descendant and child combinators.
#[derive(Debug, Clone, Copy)]
pub struct ElementPath<'a> {
    chain: &'a [Element],
}

impl<'a> ElementPath<'a> {
    /// Build a path from a root-first chain. Empty chains have no target and
    /// are rejected.
    pub fn new(chain: &'a [Element]) -> Option<Self> {
        if chain.is_empty() {
            None
        } else {
            Some(Self { chain })
        }
    }

    /// The element being inspected.
    pub fn target(&self) -> &'a Element {
        &self.chain[self.chain.len() - 1]
    }

    /// Ancestors of the target, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &'a Element> {
        self.chain[..self.chain.len() - 1].iter().rev()
    }

    /// Sub-path ending at the target's parent; `None` at the root.
    pub fn parent_path(&self) -> Option<ElementPath<'a>> {
        ElementPath::new(&self.chain[..self.chain.len() - 1])
    }
}
