//! Parser and matcher for the CSS selector subset the form controller uses.
//!
//! Supported: a comma-separated list of compound selectors, each an optional
//! tag name (or `*`) followed by any number of `#id`, `.class`, `[attr]`, and
//! `[attr="value"]` parts. Combinators (descendant, child, sibling) are not
//! supported; scoping is done by the caller querying inside a subtree.
//!
//! The browser evaluates the same selector strings natively. This parser
//! exists so configuration can be validated up front and so `MemoryDom` can
//! answer queries identically.

#[cfg(test)]
#[path = "selector_test.rs"]
mod selector_test;

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected character {found:?} at offset {offset} in {selector:?}")]
    Unexpected { selector: String, found: char, offset: usize },
    #[error("unterminated attribute selector in {0:?}")]
    UnterminatedAttribute(String),
    #[error("combinators are not supported: {0:?}")]
    Combinator(String),
}

/// Element data a selector is matched against.
pub trait SelectorTarget {
    /// Lowercase tag name.
    fn tag(&self) -> &str;
    /// Attribute value, if the attribute is present.
    fn attr(&self, name: &str) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Id(String),
    Class(String),
    Attr { name: String, value: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    parts: Vec<Part>,
}

impl Compound {
    fn matches<T: SelectorTarget + ?Sized>(&self, el: &T) -> bool {
        if let Some(tag) = &self.tag {
            if !el.tag().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        self.parts.iter().all(|part| match part {
            Part::Id(id) => el.attr("id") == Some(id.as_str()),
            Part::Class(class) => el
                .attr("class")
                .is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class)),
            Part::Attr { name, value: None } => el.attr(name).is_some(),
            Part::Attr { name, value: Some(value) } => el.attr(name) == Some(value.as_str()),
        })
    }
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Compound>,
}

impl Selector {
    /// Parse a selector string.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectorError`] if the string is empty, uses a combinator,
    /// or contains characters outside the supported grammar.
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let mut alternatives = Vec::new();
        for piece in source.split(',') {
            let piece = piece.trim();
            if piece.is_empty() {
                return Err(SelectorError::Empty);
            }
            alternatives.push(parse_compound(piece)?);
        }
        Ok(Self { source: source.trim().to_owned(), alternatives })
    }

    /// Build a selector matching elements that carry an attribute.
    #[must_use]
    pub fn has_attr(name: &str) -> Self {
        Self {
            source: format!("[{name}]"),
            alternatives: vec![Compound { tag: None, parts: vec![Part::Attr { name: name.to_owned(), value: None }] }],
        }
    }

    /// Build a selector list matching any of the given tag names.
    #[must_use]
    pub fn tags(tags: &[&str]) -> Self {
        Self {
            source: tags.join(", "),
            alternatives: tags
                .iter()
                .map(|tag| Compound { tag: Some(tag.to_ascii_lowercase()), parts: Vec::new() })
                .collect(),
        }
    }

    /// The selector text as the browser would receive it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `el` matches any alternative in the list.
    pub fn matches<T: SelectorTarget + ?Sized>(&self, el: &T) -> bool {
        self.alternatives.iter().any(|c| c.matches(el))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn parse_compound(piece: &str) -> Result<Compound, SelectorError> {
    let chars: Vec<(usize, char)> = piece.char_indices().collect();
    let unexpected = |offset: usize, found: char| SelectorError::Unexpected { selector: piece.to_owned(), found, offset };
    let mut i = 0;

    let read_ident = |i: &mut usize| -> String {
        let mut out = String::new();
        while let Some(&(_, c)) = chars.get(*i) {
            if !is_ident_char(c) {
                break;
            }
            out.push(c);
            *i += 1;
        }
        out
    };

    let mut tag = None;
    if let Some(&(_, c)) = chars.first() {
        if c == '*' {
            i = 1;
        } else if is_ident_char(c) {
            tag = Some(read_ident(&mut i).to_ascii_lowercase());
        }
    }

    let mut parts = Vec::new();
    while let Some(&(offset, c)) = chars.get(i) {
        match c {
            '#' | '.' => {
                i += 1;
                let name = read_ident(&mut i);
                if name.is_empty() {
                    return Err(unexpected(offset, c));
                }
                parts.push(if c == '#' { Part::Id(name) } else { Part::Class(name) });
            }
            '[' => {
                i += 1;
                let name = read_ident(&mut i);
                if name.is_empty() {
                    return Err(SelectorError::UnterminatedAttribute(piece.to_owned()));
                }
                let mut value = None;
                match chars.get(i) {
                    Some(&(_, ']')) => i += 1,
                    Some(&(_, '=')) => {
                        i += 1;
                        let (parsed, next) = parse_attr_value(&chars, i)
                            .ok_or_else(|| SelectorError::UnterminatedAttribute(piece.to_owned()))?;
                        value = Some(parsed);
                        i = next;
                    }
                    Some(&(at, other)) => return Err(unexpected(at, other)),
                    None => return Err(SelectorError::UnterminatedAttribute(piece.to_owned())),
                }
                parts.push(Part::Attr { name, value });
            }
            c if c.is_whitespace() || c == '>' || c == '+' || c == '~' => {
                return Err(SelectorError::Combinator(piece.to_owned()));
            }
            other => return Err(unexpected(offset, other)),
        }
    }

    if tag.is_none() && parts.is_empty() && piece != "*" {
        return Err(SelectorError::Empty);
    }
    Ok(Compound { tag, parts })
}

/// Parse `"value"]`, `'value']`, or `value]` starting at `i`. Returns the
/// value and the index just past the closing bracket.
fn parse_attr_value(chars: &[(usize, char)], mut i: usize) -> Option<(String, usize)> {
    let mut out = String::new();
    let quote = match chars.get(i)?.1 {
        q @ ('"' | '\'') => {
            i += 1;
            Some(q)
        }
        _ => None,
    };
    loop {
        let (_, c) = *chars.get(i)?;
        i += 1;
        match quote {
            Some(q) if c == q => break,
            None if c == ']' => return Some((out, i)),
            _ => out.push(c),
        }
    }
    (chars.get(i)?.1 == ']').then(|| (out, i + 1))
}
