//! A context over plain JSON data
//!
//! Expressions are deliberately small: literals (numbers, quoted strings,
//! `true`, `false`, `null`), dotted paths into the data (`a.b.0.c`), one
//! comparison (`==`, `!=`, `<`, `<=`, `>`, `>=`) and negation (`!x`,
//! `not x`). Code in `map` blocks is one `name = expression` per line.

use crate::context::Context;
use crate::error::{ContextError, ContextResult};
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;
use tracing::debug;

const OPERATORS: &[&str] = &["==", "!=", ">=", "<=", ">", "<"];

struct Loop {
    item: String,
    items: Vec<Value>,
    index: usize,
}

pub struct MapContext {
    /// Innermost scope last; there is always at least one
    scopes: Vec<Map<String, Value>>,
    loops: Vec<Loop>,
    marks: Vec<Value>,
}

impl Default for MapContext {
    fn default() -> Self {
        Self::new()
    }
}

impl MapContext {
    pub fn new() -> Self {
        Self {
            scopes: vec![Map::new()],
            loops: Vec::new(),
            marks: Vec::new(),
        }
    }

    /// A context whose outermost scope is a JSON object
    pub fn from_json(data: Value) -> ContextResult<Self> {
        match data {
            Value::Object(map) => Ok(Self {
                scopes: vec![map],
                ..Self::new()
            }),
            other => Err(ContextError::Evaluation(format!(
                "data must be an object, not {}",
                display(&other)
            ))),
        }
    }

    /// Look up a variable through the scopes, innermost first
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    fn bind(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    pub fn evaluate(&self, expression: &str) -> ContextResult<Value> {
        let expression = expression.trim();
        if expression.is_empty() {
            return Err(ContextError::Evaluation("empty expression".to_string()));
        }

        if let Some((position, operator)) = find_operator(expression) {
            let left = self.evaluate(&expression[..position])?;
            let right = self.evaluate(&expression[position + operator.len()..])?;
            return compare(&left, operator, &right).map(Value::Bool);
        }

        if let Some(rest) = expression
            .strip_prefix('!')
            .or_else(|| expression.strip_prefix("not "))
        {
            return Ok(Value::Bool(!is_truthy(&self.evaluate(rest)?)));
        }

        if let Some(literal) = literal(expression) {
            return Ok(literal);
        }

        self.path(expression)
    }

    fn path(&self, expression: &str) -> ContextResult<Value> {
        let mut segments = expression.split('.');
        let valid = |segment: &str| {
            !segment.is_empty() && segment.chars().all(|c| c.is_alphanumeric() || c == '_')
        };
        let name = segments.next().unwrap_or_default();
        if !valid(name) {
            return Err(ContextError::Evaluation(format!(
                "invalid expression '{}'",
                expression
            )));
        }
        let mut value = self
            .get(name)
            .ok_or_else(|| ContextError::Evaluation(format!("'{}' is not defined", name)))?;
        for segment in segments {
            if !valid(segment) {
                return Err(ContextError::Evaluation(format!(
                    "invalid expression '{}'",
                    expression
                )));
            }
            let next = match value {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            };
            value = next.ok_or_else(|| {
                ContextError::Evaluation(format!("'{}' has no '{}'", expression, segment))
            })?;
        }
        Ok(value.clone())
    }
}

impl Context for MapContext {
    fn accept(&self, context: &str) -> bool {
        context == "map"
    }

    fn execute(
        &mut self,
        code: &str,
        _id: &str,
        _format: &str,
        _width: &str,
        _height: &str,
        _units: &str,
    ) -> ContextResult<String> {
        for line in code.lines().map(str::trim).filter(|line| !line.is_empty()) {
            let (name, expression) = line.split_once('=').ok_or_else(|| {
                ContextError::Evaluation(format!("expected 'name = expression', got '{}'", line))
            })?;
            self.assign(name.trim(), expression)?;
        }
        Ok(String::new())
    }

    fn write(&mut self, expression: &str) -> ContextResult<String> {
        self.evaluate(expression).map(|value| display(&value))
    }

    fn test(&mut self, expression: &str) -> ContextResult<bool> {
        self.evaluate(expression).map(|value| is_truthy(&value))
    }

    fn mark(&mut self, expression: &str) -> ContextResult<()> {
        let value = self.evaluate(expression)?;
        self.marks.push(value);
        Ok(())
    }

    fn matches(&mut self, expression: &str) -> ContextResult<bool> {
        let value = self.evaluate(expression)?;
        match self.marks.last() {
            Some(mark) => Ok(equals(mark, &value)),
            None => Err(ContextError::Evaluation("no switch is active".to_string())),
        }
    }

    fn unmark(&mut self) {
        self.marks.pop();
    }

    fn begin(&mut self, item: &str, items: &str) -> ContextResult<bool> {
        let items = match self.evaluate(items)? {
            Value::Array(items) => items,
            Value::Object(map) => map.into_iter().map(|(_, value)| value).collect(),
            Value::Null => Vec::new(),
            other => {
                return Err(ContextError::Evaluation(format!(
                    "cannot loop over '{}'",
                    display(&other)
                )))
            }
        };
        debug!(item, count = items.len(), "Beginning loop");
        let Some(first) = items.first().cloned() else {
            return Ok(false);
        };
        let mut scope = Map::new();
        scope.insert(item.to_string(), first);
        self.scopes.push(scope);
        self.loops.push(Loop {
            item: item.to_string(),
            items,
            index: 0,
        });
        Ok(true)
    }

    fn next(&mut self) -> ContextResult<bool> {
        let Some(current) = self.loops.last_mut() else {
            return Err(ContextError::Evaluation("no loop is active".to_string()));
        };
        current.index += 1;
        match current.items.get(current.index).cloned() {
            Some(value) => {
                let item = current.item.clone();
                self.bind(&item, value);
                Ok(true)
            }
            None => {
                self.loops.pop();
                self.scopes.pop();
                Ok(false)
            }
        }
    }

    fn enter(&mut self, expression: &str) -> ContextResult<()> {
        let scope = if expression.trim().is_empty() {
            Map::new()
        } else {
            match self.evaluate(expression)? {
                Value::Object(map) => map,
                other => {
                    return Err(ContextError::Evaluation(format!(
                        "cannot enter '{}'",
                        display(&other)
                    )))
                }
            }
        };
        self.scopes.push(scope);
        Ok(())
    }

    fn exit(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    fn assign(&mut self, name: &str, expression: &str) -> ContextResult<()> {
        let value = self.evaluate(expression)?;
        self.bind(name, value);
        Ok(())
    }

    fn input(&mut self, name: &str, kind: &str, value: &str) -> ContextResult<()> {
        let invalid = || ContextError::Evaluation(format!("'{}' is not a valid {}", value, kind));
        let value = match kind {
            "number" | "integer" | "float" => number(value.trim()).ok_or_else(invalid)?,
            "boolean" => match value.trim() {
                "true" | "1" | "on" => Value::Bool(true),
                "false" | "0" | "off" | "" => Value::Bool(false),
                _ => return Err(invalid()),
            },
            _ => Value::String(value.to_string()),
        };
        self.bind(name, value);
        Ok(())
    }
}

/// Position of the first comparison operator outside quotes
fn find_operator(expression: &str) -> Option<(usize, &'static str)> {
    let mut quote: Option<char> = None;
    for (position, c) in expression.char_indices() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None => {
                let rest = &expression[position..];
                if let Some(operator) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
                    return Some((position, *operator));
                }
            }
        }
    }
    None
}

fn literal(expression: &str) -> Option<Value> {
    match expression {
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        "null" => return Some(Value::Null),
        _ => {}
    }
    for quote in ['"', '\''] {
        if expression.len() >= 2 && expression.starts_with(quote) && expression.ends_with(quote) {
            return Some(Value::String(expression[1..expression.len() - 1].to_string()));
        }
    }
    number(expression)
}

fn number(text: &str) -> Option<Value> {
    if let Ok(integer) = text.parse::<i64>() {
        return Some(Value::Number(integer.into()));
    }
    text.parse::<f64>()
        .ok()
        .filter(|float| float.is_finite())
        .and_then(Number::from_f64)
        .map(Value::Number)
}

fn equals(left: &Value, right: &Value) -> bool {
    match (left.as_f64(), right.as_f64()) {
        (Some(left), Some(right)) => left == right,
        _ => left == right,
    }
}

fn compare(left: &Value, operator: &str, right: &Value) -> ContextResult<bool> {
    match operator {
        "==" => return Ok(equals(left, right)),
        "!=" => return Ok(!equals(left, right)),
        _ => {}
    }
    let ordering = match (left, right) {
        (Value::Number(_), Value::Number(_)) => left
            .as_f64()
            .zip(right.as_f64())
            .and_then(|(left, right)| left.partial_cmp(&right)),
        (Value::String(left), Value::String(right)) => Some(left.cmp(right)),
        _ => None,
    }
    .ok_or_else(|| {
        ContextError::Evaluation(format!(
            "cannot compare '{}' and '{}'",
            display(left),
            display(right)
        ))
    })?;
    Ok(match operator {
        ">" => ordering == Ordering::Greater,
        "<" => ordering == Ordering::Less,
        ">=" => ordering != Ordering::Less,
        _ => ordering != Ordering::Greater,
    })
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Text written into the document for a value
pub fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
