//! Minimal CSS selectors for querying a [`Document`]
//!
//! Supported: type (`p`, `*`), `#id`, `.class`, `[attr]`, `[attr=value]`
//! (value optionally quoted), descendant (` `) and child (`>`) combinators,
//! and comma separated selector lists.

use crate::node::{Document, NodeId};
use thiserror::Error;

pub type SelectorResult<T> = Result<T, SelectorError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectorError {
    #[error("Empty selector")]
    Empty,

    #[error("Invalid selector '{selector}' at {pos}: {message}")]
    Invalid {
        selector: String,
        pos: usize,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
enum Condition {
    Id(String),
    Class(String),
    Has(String),
    Equals(String, String),
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Compound {
    tag: Option<String>,
    conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Combinator {
    Descendant,
    Child,
}

/// A single complex selector stored right-to-left
#[derive(Debug, Clone, PartialEq)]
struct Complex {
    subject: Compound,
    ancestors: Vec<(Combinator, Compound)>,
}

/// A parsed selector list
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

impl Selector {
    pub fn parse(source: &str) -> SelectorResult<Self> {
        let mut alternatives = Vec::new();
        for part in split_top_level(source) {
            if part.trim().is_empty() {
                return Err(SelectorError::Empty);
            }
            alternatives.push(parse_complex(source, part)?);
        }
        if alternatives.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Self { alternatives })
    }

    /// Selector matching elements that carry an attribute
    pub fn attribute(name: impl Into<String>) -> Self {
        Self::single(Compound {
            tag: None,
            conditions: vec![Condition::Has(name.into())],
        })
    }

    /// Selector matching elements whose attribute equals a value
    pub fn attribute_equals(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::single(Compound {
            tag: None,
            conditions: vec![Condition::Equals(name.into(), value.into())],
        })
    }

    fn single(subject: Compound) -> Self {
        Self {
            alternatives: vec![Complex {
                subject,
                ancestors: Vec::new(),
            }],
        }
    }

    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        doc.is_element(node)
            && self
                .alternatives
                .iter()
                .any(|complex| complex.matches(doc, node))
    }
}

impl Complex {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.subject.matches(doc, node) && self.matches_ancestors(doc, node, 0)
    }

    fn matches_ancestors(&self, doc: &Document, node: NodeId, index: usize) -> bool {
        let Some((combinator, compound)) = self.ancestors.get(index) else {
            return true;
        };
        let mut current = doc.parent(node);
        while let Some(ancestor) = current {
            if doc.is_element(ancestor)
                && compound.matches(doc, ancestor)
                && self.matches_ancestors(doc, ancestor, index + 1)
            {
                return true;
            }
            if *combinator == Combinator::Child {
                return false;
            }
            current = doc.parent(ancestor);
        }
        false
    }
}

impl Compound {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        if let Some(tag) = &self.tag {
            if doc.name(node) != tag {
                return false;
            }
        }
        self.conditions.iter().all(|condition| match condition {
            Condition::Id(id) => doc.attr(node, "id") == Some(id.as_str()),
            Condition::Class(class) => doc
                .attr(node, "class")
                .map(|classes| classes.split_whitespace().any(|c| c == class))
                .unwrap_or(false),
            Condition::Has(name) => doc.has_attr(node, name),
            Condition::Equals(name, value) => doc.attr(node, name) == Some(value.as_str()),
        })
    }
}

/// Split on commas that are not inside brackets or quotes
fn split_top_level(source: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in source.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&source[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&source[start..]);
    parts
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn parse_complex(selector: &str, source: &str) -> SelectorResult<Complex> {
    let invalid = |pos: usize, message: &str| SelectorError::Invalid {
        selector: selector.to_string(),
        pos,
        message: message.to_string(),
    };

    let chars: Vec<char> = source.chars().collect();
    let mut pos = 0;
    let mut compounds: Vec<Compound> = Vec::new();
    let mut combinators: Vec<Combinator> = Vec::new();
    let mut pending: Option<Combinator> = None;

    let read_name = |pos: &mut usize| -> String {
        let start = *pos;
        while *pos < chars.len() && is_name_char(chars[*pos]) {
            *pos += 1;
        }
        chars[start..*pos].iter().collect()
    };

    while pos < chars.len() {
        let c = chars[pos];
        if c.is_whitespace() {
            pos += 1;
            if !compounds.is_empty() && pending.is_none() {
                pending = Some(Combinator::Descendant);
            }
            continue;
        }
        if c == '>' {
            if compounds.is_empty() {
                return Err(invalid(pos, "combinator without left hand side"));
            }
            pending = Some(Combinator::Child);
            pos += 1;
            continue;
        }

        // A compound selector
        let mut compound = Compound::default();
        if c == '*' {
            pos += 1;
        } else if is_name_char(c) {
            compound.tag = Some(read_name(&mut pos));
        }
        loop {
            match chars.get(pos) {
                Some('#') => {
                    pos += 1;
                    let name = read_name(&mut pos);
                    if name.is_empty() {
                        return Err(invalid(pos, "expected id"));
                    }
                    compound.conditions.push(Condition::Id(name));
                }
                Some('.') => {
                    pos += 1;
                    let name = read_name(&mut pos);
                    if name.is_empty() {
                        return Err(invalid(pos, "expected class"));
                    }
                    compound.conditions.push(Condition::Class(name));
                }
                Some('[') => {
                    pos += 1;
                    let name = read_name(&mut pos);
                    if name.is_empty() {
                        return Err(invalid(pos, "expected attribute name"));
                    }
                    match chars.get(pos) {
                        Some(']') => {
                            pos += 1;
                            compound.conditions.push(Condition::Has(name));
                        }
                        Some('=') => {
                            pos += 1;
                            let value = match chars.get(pos) {
                                Some(q @ ('"' | '\'')) => {
                                    let q = *q;
                                    pos += 1;
                                    let start = pos;
                                    while pos < chars.len() && chars[pos] != q {
                                        pos += 1;
                                    }
                                    if pos >= chars.len() {
                                        return Err(invalid(pos, "unterminated string"));
                                    }
                                    let value: String = chars[start..pos].iter().collect();
                                    pos += 1;
                                    value
                                }
                                _ => {
                                    let start = pos;
                                    while pos < chars.len() && chars[pos] != ']' {
                                        pos += 1;
                                    }
                                    chars[start..pos].iter().collect::<String>().trim().to_string()
                                }
                            };
                            if chars.get(pos) != Some(&']') {
                                return Err(invalid(pos, "expected ']'"));
                            }
                            pos += 1;
                            compound.conditions.push(Condition::Equals(name, value));
                        }
                        _ => return Err(invalid(pos, "expected ']' or '='")),
                    }
                }
                _ => break,
            }
        }
        if compound.tag.is_none() && compound.conditions.is_empty() && c != '*' {
            return Err(invalid(pos, "unexpected character"));
        }
        if let Some(combinator) = pending.take() {
            combinators.push(combinator);
        }
        compounds.push(compound);
    }

    let Some(subject) = compounds.pop() else {
        return Err(SelectorError::Empty);
    };
    if pending == Some(Combinator::Child) {
        return Err(invalid(pos, "combinator without right hand side"));
    }
    let ancestors = combinators
        .into_iter()
        .rev()
        .zip(compounds.into_iter().rev())
        .collect();
    Ok(Complex { subject, ancestors })
}
