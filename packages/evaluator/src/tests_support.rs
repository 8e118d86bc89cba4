/// Shared helpers for evaluator tests
use crate::context::Context;
use crate::error::{ContextError, ContextResult};
use std::collections::HashMap;
use stencil_dom::{Document, NodeId, Snapshot};

/// A scripted context that records every call made to it
#[derive(Default)]
pub struct Recorder {
    pub calls: Vec<String>,
    pub accepted: Vec<&'static str>,
    pub tests: HashMap<&'static str, bool>,
    pub writes: HashMap<&'static str, &'static str>,
    pub matching: Vec<&'static str>,
    pub counts: HashMap<&'static str, usize>,
    /// Method that fails with `Unsupported`
    pub failing: Option<&'static str>,
    /// Expressions that fail to evaluate
    pub invalid: Vec<&'static str>,
    pub ids: Vec<String>,
    loops: Vec<(usize, usize)>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, method: &str, call: String) -> ContextResult<()> {
        self.calls.push(call);
        if self.failing == Some(method) {
            return Err(ContextError::unsupported(method));
        }
        Ok(())
    }
}

impl Context for Recorder {
    fn accept(&self, context: &str) -> bool {
        self.accepted.iter().any(|accepted| *accepted == context)
    }

    fn execute(
        &mut self,
        _code: &str,
        id: &str,
        format: &str,
        width: &str,
        height: &str,
        units: &str,
    ) -> ContextResult<String> {
        self.record(
            "execute",
            format!("execute({},{},{},{})", format, width, height, units),
        )?;
        self.ids.push(id.to_string());
        Ok("result".to_string())
    }

    fn write(&mut self, expression: &str) -> ContextResult<String> {
        self.record("write", format!("write({})", expression))?;
        Ok(self
            .writes
            .get(expression)
            .map(|value| value.to_string())
            .unwrap_or_else(|| expression.to_string()))
    }

    fn test(&mut self, expression: &str) -> ContextResult<bool> {
        self.record("test", format!("test({})", expression))?;
        if self.invalid.iter().any(|invalid| *invalid == expression) {
            return Err(ContextError::Evaluation(format!("invalid {}", expression)));
        }
        Ok(self.tests.get(expression).copied().unwrap_or(false))
    }

    fn mark(&mut self, expression: &str) -> ContextResult<()> {
        self.record("mark", format!("mark({})", expression))
    }

    fn matches(&mut self, expression: &str) -> ContextResult<bool> {
        self.record("match", format!("match({})", expression))?;
        Ok(self.matching.iter().any(|matching| *matching == expression))
    }

    fn unmark(&mut self) {
        self.calls.push("unmark".to_string());
    }

    fn begin(&mut self, item: &str, items: &str) -> ContextResult<bool> {
        self.record("begin", format!("begin({},{})", item, items))?;
        let count = self.counts.get(items).copied().unwrap_or(0);
        if count == 0 {
            return Ok(false);
        }
        self.loops.push((0, count));
        Ok(true)
    }

    fn next(&mut self) -> ContextResult<bool> {
        self.record("next", "next".to_string())?;
        let Some((index, count)) = self.loops.last_mut() else {
            return Ok(false);
        };
        *index += 1;
        if *index < *count {
            Ok(true)
        } else {
            self.loops.pop();
            Ok(false)
        }
    }

    fn enter(&mut self, expression: &str) -> ContextResult<()> {
        self.record("enter", format!("enter({})", expression))
    }

    fn exit(&mut self) {
        self.calls.push("exit".to_string());
    }

    fn assign(&mut self, name: &str, expression: &str) -> ContextResult<()> {
        self.record("assign", format!("assign({},{})", name, expression))
    }

    fn input(&mut self, name: &str, kind: &str, value: &str) -> ContextResult<()> {
        self.record("input", format!("input({},{},{})", name, kind, value))
    }
}

pub fn el(tag: &str) -> Snapshot {
    Snapshot::element(tag)
}

/// A document whose top level children are `children`
pub fn document(children: Vec<Snapshot>) -> Document {
    Document::from_snapshot(&Snapshot::Document(children))
}

/// The `index`th top level node
pub fn top(doc: &Document, index: usize) -> NodeId {
    doc.children(doc.root())[index]
}

pub fn snapshot(doc: &Document) -> Snapshot {
    doc.snapshot(doc.root())
}
