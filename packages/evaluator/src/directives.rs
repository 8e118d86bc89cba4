//! Typed forms of directive arguments
//!
//! Each directive attribute value has a small grammar, e.g. `item in items`
//! for `data-for`. Parsing is separate from rendering so that tools can list
//! the parameters and executable blocks of a document without a context.

use crate::context::Context;
use crate::error::{ContextResult, DirectiveError, DirectiveResult};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use stencil_dom::{Document, NodeId};

/// Contexts an `exec` directive may name
pub const EXEC_CONTEXTS: &[&str] = &["map", "exec", "cila", "html", "js", "py", "r"];

pub const EXEC_FORMATS: &[&str] = &["", "text", "png", "jpg", "svg"];

pub const EXEC_UNITS: &[&str] = &["cm", "in", "px"];

struct Patterns {
    exec: Regex,
    size: Regex,
    attr: Regex,
    each: Regex,
    par: Regex,
    set: Regex,
    include: Regex,
    name: Regex,
}

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("static pattern")
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(|| Patterns {
    exec: pattern(
        r"^(\w+(?:\s*,\s*\w+)*)(\s+(eval\s+)?format\s+(.+?))?(\s+(eval\s+)?width\s+(.+?))?(\s+(eval\s+)?height\s+(.+?))?(\s+(eval\s+)?units\s+(.+?))?(\s+(eval\s+)?size\s+(.+?))?(\s+(const))?(\s+(volat))?(\s+(show))?\s*$",
    ),
    size: pattern(r"^([0-9]*\.?[0-9]+)x([0-9]*\.?[0-9]+)(\w+)?$"),
    attr: pattern(r"^([\w-]+)(\s+value\s+(.+?))?(\s+given\s+(.+?))?$"),
    each: pattern(r"^(\w+)\s+in\s+(.+)$"),
    par: pattern(r"^(\w+)(\s+type\s+(\w+))?(\s+default\s+(.+))?$"),
    set: pattern(r"^(\w+)\s+to\s+(.+)$"),
    include: pattern(
        r"^(((eval)\s+)?(.+?))(\s+select\s+((eval)\s+)?(.+?))?(\s+(complete))?(\s+(names))?$",
    ),
    name: pattern(r"^[\w-]+$"),
});

fn group(captures: &Captures, index: usize) -> Option<String> {
    captures
        .get(index)
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

/// A value that is either literal or an expression for the context to write
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Evaluable {
    pub eval: bool,
    pub value: String,
}

impl Evaluable {
    fn from(captures: &Captures, eval: usize, value: usize) -> Self {
        Self {
            eval: captures.get(eval).is_some(),
            value: group(captures, value).unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// The literal value, or what the context writes for the expression
    pub fn resolve(&self, context: &mut dyn Context) -> ContextResult<String> {
        if self.eval && !self.value.is_empty() {
            context.write(&self.value)
        } else {
            Ok(self.value.clone())
        }
    }
}

/// `data-exec`: a block of code and how to present its output
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Execute {
    pub contexts: Vec<String>,
    pub format: Evaluable,
    pub width: Evaluable,
    pub height: Evaluable,
    pub units: Evaluable,
    pub size: Evaluable,
    pub constant: bool,
    pub volatile: bool,
    pub show: bool,
}

impl Execute {
    pub fn parse(value: &str) -> DirectiveResult<Self> {
        let captures = PATTERNS
            .exec
            .captures(value.trim())
            .ok_or_else(|| DirectiveError::syntax("exec", value))?;

        let contexts: Vec<String> = captures[1]
            .split(',')
            .map(|context| context.trim().to_string())
            .collect();
        if let Some(unknown) = contexts
            .iter()
            .find(|context| !EXEC_CONTEXTS.contains(&context.as_str()))
        {
            return Err(DirectiveError::invalid("context", unknown));
        }

        Ok(Self {
            contexts,
            format: Evaluable::from(&captures, 3, 4),
            width: Evaluable::from(&captures, 6, 7),
            height: Evaluable::from(&captures, 9, 10),
            units: Evaluable::from(&captures, 12, 13),
            size: Evaluable::from(&captures, 15, 16),
            constant: captures.get(18).is_some(),
            volatile: captures.get(20).is_some(),
            show: captures.get(22).is_some(),
        })
    }
}

/// Width, height and units from a `WxHunits` size
pub fn parse_size(size: &str) -> DirectiveResult<(String, String, Option<String>)> {
    let captures = PATTERNS
        .size
        .captures(size)
        .ok_or_else(|| DirectiveError::invalid("size", size))?;
    Ok((
        captures[1].to_string(),
        captures[2].to_string(),
        group(&captures, 3),
    ))
}

/// `data-where`: the contexts a subtree is meant for
pub fn parse_where(value: &str) -> DirectiveResult<Vec<String>> {
    let contexts: Vec<String> = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|context| !context.is_empty())
        .map(str::to_string)
        .collect();
    if contexts.is_empty() {
        return Err(DirectiveError::empty("where"));
    }
    Ok(contexts)
}

/// `data-attr`: `name [value expr] [given expr]`
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub name: String,
    pub value: Option<String>,
    pub given: Option<String>,
}

impl Attr {
    pub fn parse(value: &str) -> DirectiveResult<Self> {
        let captures = PATTERNS
            .attr
            .captures(value.trim())
            .ok_or_else(|| DirectiveError::syntax("attr", value))?;
        Ok(Self {
            name: captures[1].to_string(),
            value: group(&captures, 3),
            given: group(&captures, 5),
        })
    }
}

/// `data-for`: `item in items`
#[derive(Debug, Clone, PartialEq)]
pub struct For {
    pub item: String,
    pub items: String,
}

impl For {
    pub fn parse(value: &str) -> DirectiveResult<Self> {
        let captures = PATTERNS
            .each
            .captures(value.trim())
            .ok_or_else(|| DirectiveError::syntax("for", value))?;
        Ok(Self {
            item: captures[1].to_string(),
            items: captures[2].trim().to_string(),
        })
    }
}

/// `data-par`: `name [type t] [default expr]`
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub kind: Option<String>,
    pub default: Option<String>,
}

impl Parameter {
    pub fn parse(value: &str) -> DirectiveResult<Self> {
        let captures = PATTERNS
            .par
            .captures(value.trim())
            .ok_or_else(|| DirectiveError::syntax("par", value))?;
        Ok(Self {
            name: captures[1].to_string(),
            kind: group(&captures, 3),
            default: group(&captures, 5),
        })
    }

    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or("")
    }
}

/// `data-set`: `name to expr`
#[derive(Debug, Clone, PartialEq)]
pub struct Set {
    pub name: String,
    pub expression: String,
}

impl Set {
    pub fn parse(value: &str) -> DirectiveResult<Self> {
        let captures = PATTERNS
            .set
            .captures(value.trim())
            .ok_or_else(|| DirectiveError::syntax("set", value))?;
        Ok(Self {
            name: captures[1].to_string(),
            expression: captures[2].trim().to_string(),
        })
    }
}

/// `data-include`: `[eval] address [select [eval] selector] [complete] [names]`
#[derive(Debug, Clone, PartialEq)]
pub struct Include {
    pub address: Evaluable,
    pub select: Evaluable,
    pub complete: bool,
    pub names: bool,
}

impl Include {
    pub fn parse(value: &str) -> DirectiveResult<Self> {
        let captures = PATTERNS
            .include
            .captures(value.trim())
            .ok_or_else(|| DirectiveError::syntax("include", value))?;
        Ok(Self {
            address: Evaluable::from(&captures, 3, 4),
            select: Evaluable::from(&captures, 7, 8),
            complete: captures.get(10).is_some(),
            names: captures.get(12).is_some(),
        })
    }
}

/// `data-macro`: the macro's name
pub fn parse_macro(value: &str) -> DirectiveResult<String> {
    let name = value.trim();
    if !PATTERNS.name.is_match(name) {
        return Err(DirectiveError::syntax("macro", value));
    }
    Ok(name.to_string())
}

fn inventory<T>(
    doc: &Document,
    attr: &str,
    parse: impl Fn(&str) -> DirectiveResult<T>,
) -> Vec<(NodeId, T)> {
    doc.filter_attr(doc.root(), attr)
        .into_iter()
        .filter_map(|id| {
            let value = doc.attr(id, attr)?;
            parse(value).ok().map(|parsed| (id, parsed))
        })
        .collect()
}

/// The valid parameters of a document in document order
pub fn parameters(doc: &Document) -> Vec<(NodeId, Parameter)> {
    inventory(doc, "data-par", Parameter::parse)
}

/// The valid executable blocks of a document in document order
pub fn executes(doc: &Document) -> Vec<(NodeId, Execute)> {
    inventory(doc, "data-exec", Execute::parse)
}
