//! Selector Parsing & Matching
//!
//! Enough of CSS selector matching to decide whether a harvested rule
//! applies to the inspected element: compound selectors built from type,
//! universal, id, class and attribute components, selector lists, and
//! descendant/child combinators walked over the element's ancestor chain.
//!
//! Anything outside that subset (sibling combinators, pseudo-classes,
//! pseudo-elements) fails to parse, and a selector that fails to parse is
//! treated as non-matching — never as an error.

use peek_dom::{Element, ElementPath};
use thiserror::Error;

/// Selector parse failure. Callers on the match path treat this as
/// "does not match".
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unsupported token '{0}' in selector")]
    Unsupported(String),
    #[error("unterminated attribute selector")]
    UnterminatedAttribute,
    #[error("malformed attribute selector '{0}'")]
    MalformedAttribute(String),
}

/// A parsed selector list (`a, b, c`). Matches when any alternative does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    alternatives: Vec<ComplexSelector>,
}

/// A sequence of compounds joined by combinators, rightmost last.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ComplexSelector {
    /// The combinator at index i joins `compounds[i-1]` (ancestor side) to
    /// `compounds[i]`; `combinators[0]` is unused padding.
    compounds: Vec<Compound>,
    combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// One compound selector: every component must match the same element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    components: Vec<Component>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Component {
    Universal,
    Type(String),
    Id(String),
    Class(String),
    Attribute(AttributeSelector),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeSelector {
    name: String,
    matcher: Option<AttributeMatcher>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttributeMatcher {
    /// [attr=value]
    Exact(String),
    /// [attr~=value] — whitespace-separated word list contains
    Includes(String),
    /// [attr|=value] — exact or hyphen-prefixed
    DashMatch(String),
    /// [attr^=value]
    Prefix(String),
    /// [attr$=value]
    Suffix(String),
    /// [attr*=value]
    Substring(String),
}

/// Check whether a selector string matches the element at the end of `path`.
///
/// Parse failures and unsupported syntax make the selector non-matching.
pub fn element_matches(selector: &str, path: &ElementPath) -> bool {
    match parse_selector_list(selector) {
        Ok(list) => list.matches(path),
        Err(err) => {
            tracing::trace!("selector '{}' not matchable: {}", selector, err);
            false
        }
    }
}

/// Parse a full selector list.
pub fn parse_selector_list(selector: &str) -> Result<SelectorList, SelectorError> {
    let mut alternatives = Vec::new();
    for part in split_top_level_commas(selector) {
        let part = part.trim();
        if part.is_empty() {
            return Err(SelectorError::Empty);
        }
        alternatives.push(parse_complex(part)?);
    }
    if alternatives.is_empty() {
        return Err(SelectorError::Empty);
    }
    Ok(SelectorList { alternatives })
}

impl SelectorList {
    pub fn matches(&self, path: &ElementPath) -> bool {
        self.alternatives.iter().any(|alt| alt.matches(path))
    }
}

impl ComplexSelector {
    fn matches(&self, path: &ElementPath) -> bool {
        let last = self.compounds.len() - 1;
        if !self.compounds[last].matches(path.target()) {
            return false;
        }
        self.matches_ancestors(last, path)
    }

    /// Match compounds left of `index` against ancestors of the path target.
    fn matches_ancestors(&self, index: usize, path: &ElementPath) -> bool {
        if index == 0 {
            return true;
        }
        let needed = &self.compounds[index - 1];
        match self.combinators[index] {
            Combinator::Child => {
                let Some(parent) = path.parent_path() else {
                    return false;
                };
                needed.matches(parent.target()) && self.matches_ancestors(index - 1, &parent)
            }
            Combinator::Descendant => {
                let mut current = path.parent_path();
                while let Some(ancestor_path) = current {
                    if needed.matches(ancestor_path.target())
                        && self.matches_ancestors(index - 1, &ancestor_path)
                    {
                        return true;
                    }
                    current = ancestor_path.parent_path();
                }
                false
            }
        }
    }
}

impl Compound {
    fn matches(&self, element: &Element) -> bool {
        self.components.iter().all(|c| c.matches(element))
    }
}

impl Component {
    fn matches(&self, element: &Element) -> bool {
        match self {
            Self::Universal => true,
            Self::Type(tag) => element.tag_name.eq_ignore_ascii_case(tag),
            Self::Id(id) => element.id.as_deref() == Some(id.as_str()),
            Self::Class(class) => element.has_class(class),
            Self::Attribute(attr) => attr.matches(element.attr(&attr.name)),
        }
    }
}

impl AttributeSelector {
    fn matches(&self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match &self.matcher {
            None => true,
            Some(AttributeMatcher::Exact(expected)) => value == expected,
            Some(AttributeMatcher::Includes(expected)) => {
                value.split_whitespace().any(|w| w == expected)
            }
            Some(AttributeMatcher::DashMatch(expected)) => {
                value == expected || value.starts_with(&format!("{}-", expected))
            }
            Some(AttributeMatcher::Prefix(expected)) => value.starts_with(expected.as_str()),
            Some(AttributeMatcher::Suffix(expected)) => value.ends_with(expected.as_str()),
            Some(AttributeMatcher::Substring(expected)) => value.contains(expected.as_str()),
        }
    }
}

/// Split on commas that sit outside `[...]` brackets and quotes.
fn split_top_level_commas(selector: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0usize;

    for (i, ch) in selector.char_indices() {
        match ch {
            '"' | '\'' => match quote {
                Some(q) if q == ch => quote = None,
                None => quote = Some(ch),
                _ => {}
            },
            '[' if quote.is_none() => depth += 1,
            ']' if quote.is_none() => depth = depth.saturating_sub(1),
            ',' if quote.is_none() && depth == 0 => {
                parts.push(&selector[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&selector[start..]);
    parts
}

fn parse_complex(selector: &str) -> Result<ComplexSelector, SelectorError> {
    let mut compounds = Vec::new();
    let mut combinators = vec![Combinator::Descendant];
    let mut pending = Combinator::Descendant;
    let mut seen_gap = false;
    let chars: Vec<char> = selector.chars().collect();
    let mut i = 0usize;

    while i < chars.len() {
        let ch = chars[i];
        if ch.is_whitespace() {
            seen_gap = true;
            i += 1;
            continue;
        }
        if ch == '>' {
            if compounds.is_empty() {
                return Err(SelectorError::Unsupported(">".to_string()));
            }
            pending = Combinator::Child;
            seen_gap = true;
            i += 1;
            continue;
        }
        if ch == '+' || ch == '~' || ch == ':' {
            return Err(SelectorError::Unsupported(ch.to_string()));
        }

        let (compound, consumed) = parse_compound(&chars[i..])?;
        if !compounds.is_empty() {
            if !seen_gap {
                // Two compounds without a combinator can't happen; compound
                // parsing stops only at gaps or combinators.
                return Err(SelectorError::Unsupported(ch.to_string()));
            }
            combinators.push(pending);
        }
        compounds.push(compound);
        pending = Combinator::Descendant;
        seen_gap = false;
        i += consumed;
    }

    if compounds.is_empty() {
        return Err(SelectorError::Empty);
    }
    Ok(ComplexSelector {
        compounds,
        combinators,
    })
}

/// Parse one compound starting at `chars[0]`; returns it and the number of
/// chars consumed (stops at whitespace or a combinator).
fn parse_compound(chars: &[char]) -> Result<(Compound, usize), SelectorError> {
    let mut compound = Compound::default();
    let mut i = 0usize;

    while i < chars.len() {
        let ch = chars[i];
        if ch.is_whitespace() || ch == '>' {
            break;
        }
        match ch {
            '*' => {
                compound.components.push(Component::Universal);
                i += 1;
            }
            '#' => {
                let (name, used) = read_name(&chars[i + 1..]);
                if name.is_empty() {
                    return Err(SelectorError::Unsupported("#".to_string()));
                }
                compound.components.push(Component::Id(name));
                i += 1 + used;
            }
            '.' => {
                let (name, used) = read_name(&chars[i + 1..]);
                if name.is_empty() {
                    return Err(SelectorError::Unsupported(".".to_string()));
                }
                compound.components.push(Component::Class(name));
                i += 1 + used;
            }
            '[' => {
                let (attr, used) = parse_attribute(&chars[i..])?;
                compound.components.push(Component::Attribute(attr));
                i += used;
            }
            ':' | '+' | '~' => {
                return Err(SelectorError::Unsupported(ch.to_string()));
            }
            _ if is_name_char(ch) => {
                let (name, used) = read_name(&chars[i..]);
                compound.components.push(Component::Type(name));
                i += used;
            }
            _ => {
                return Err(SelectorError::Unsupported(ch.to_string()));
            }
        }
    }

    if compound.components.is_empty() {
        return Err(SelectorError::Empty);
    }
    Ok((compound, i))
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

fn read_name(chars: &[char]) -> (String, usize) {
    let mut name = String::new();
    for &ch in chars {
        if is_name_char(ch) {
            name.push(ch);
        } else {
            break;
        }
    }
    let used = name.chars().count();
    (name, used)
}

/// Parse `[name]`, `[name=value]`, `[name~=value]` etc. starting at `[`.
fn parse_attribute(chars: &[char]) -> Result<(AttributeSelector, usize), SelectorError> {
    let close = chars
        .iter()
        .position(|&c| c == ']')
        .ok_or(SelectorError::UnterminatedAttribute)?;
    let inner: String = chars[1..close].iter().collect();
    let inner = inner.trim();

    let attr = match inner.find('=') {
        None => {
            let name = inner.to_string();
            if name.is_empty() || !name.chars().all(is_name_char) {
                return Err(SelectorError::MalformedAttribute(inner.to_string()));
            }
            AttributeSelector {
                name,
                matcher: None,
            }
        }
        Some(eq) => {
            let (raw_name, raw_value) = inner.split_at(eq);
            let raw_value = &raw_value[1..];
            let (name, op) = match raw_name.chars().last() {
                Some(last @ ('~' | '|' | '^' | '$' | '*')) => {
                    (&raw_name[..raw_name.len() - 1], last)
                }
                _ => (raw_name, '='),
            };
            let name = name.trim().to_string();
            if name.is_empty() || !name.chars().all(is_name_char) {
                return Err(SelectorError::MalformedAttribute(inner.to_string()));
            }
            let value = unquote(raw_value.trim()).to_string();
            let matcher = match op {
                '~' => AttributeMatcher::Includes(value),
                '|' => AttributeMatcher::DashMatch(value),
                '^' => AttributeMatcher::Prefix(value),
                '$' => AttributeMatcher::Suffix(value),
                '*' => AttributeMatcher::Substring(value),
                _ => AttributeMatcher::Exact(value),
            };
            AttributeSelector {
                name,
                matcher: Some(matcher),
            }
        }
    };

    Ok((attr, close + 1))
}

fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_of(chain: &[Element]) -> ElementPath<'_> {
        ElementPath::new(chain).unwrap()
    }

    #[test]
    fn test_simple_matching() {
        let chain = vec![Element::new("div").with_id("main").with_class("card")];
        let path = path_of(&chain);

        assert!(element_matches("div", &path));
        assert!(element_matches("*", &path));
        assert!(element_matches("#main", &path));
        assert!(element_matches(".card", &path));
        assert!(element_matches("div.card#main", &path));
        assert!(!element_matches("span", &path));
        assert!(!element_matches(".other", &path));
    }

    #[test]
    fn test_selector_list() {
        let chain = vec![Element::new("p")];
        let path = path_of(&chain);

        assert!(element_matches("h1, p, span", &path));
        assert!(!element_matches("h1, span", &path));
    }

    #[test]
    fn test_descendant_combinator() {
        let chain = vec![
            Element::new("article").with_class("post"),
            Element::new("div"),
            Element::new("a"),
        ];
        let path = path_of(&chain);

        assert!(element_matches(".post a", &path));
        assert!(element_matches("article div a", &path));
        assert!(!element_matches(".sidebar a", &path));
    }

    #[test]
    fn test_child_combinator() {
        let chain = vec![
            Element::new("ul").with_class("menu"),
            Element::new("li"),
            Element::new("a"),
        ];
        let path = path_of(&chain);

        assert!(element_matches("li > a", &path));
        assert!(element_matches(".menu > li > a", &path));
        assert!(!element_matches(".menu > a", &path));
        assert!(element_matches(".menu a", &path));
    }

    #[test]
    fn test_attribute_selectors() {
        let chain = vec![
            Element::new("input")
                .with_attr("type", "text")
                .with_attr("data-role", "search-box")
                .with_attr("class", "a b"),
        ];
        let path = path_of(&chain);

        assert!(element_matches("[type]", &path));
        assert!(element_matches("[type=text]", &path));
        assert!(element_matches("[type=\"text\"]", &path));
        assert!(element_matches("[data-role^=search]", &path));
        assert!(element_matches("[data-role$=box]", &path));
        assert!(element_matches("[data-role*=rch-b]", &path));
        assert!(element_matches("[class~=b]", &path));
        assert!(element_matches("[data-role|=search]", &path));
        assert!(!element_matches("[type=password]", &path));
        assert!(!element_matches("[missing]", &path));
    }

    #[test]
    fn test_unsupported_is_non_matching() {
        let chain = vec![Element::new("a")];
        let path = path_of(&chain);

        // Pseudo-classes and sibling combinators are out of scope; the rule
        // simply doesn't apply.
        assert!(!element_matches("a:hover", &path));
        assert!(!element_matches("h1 + a", &path));
        assert!(!element_matches("h1 ~ a", &path));
        assert!(!element_matches("", &path));
        assert!(!element_matches("a::before", &path));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_selector_list(""), Err(SelectorError::Empty));
        assert!(matches!(
            parse_selector_list("a:hover"),
            Err(SelectorError::Unsupported(_))
        ));
        assert_eq!(
            parse_selector_list("[attr"),
            Err(SelectorError::UnterminatedAttribute)
        );
    }

    #[test]
    fn test_comma_split_respects_brackets() {
        let chain = vec![Element::new("input").with_attr("data-x", "a,b")];
        let path = path_of(&chain);
        assert!(element_matches("[data-x=\"a,b\"]", &path));
    }
}
