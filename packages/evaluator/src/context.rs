use crate::error::{ContextError, ContextResult};

/// An engine that evaluates the expressions and code held by directives
///
/// A renderer drives a context through a fixed protocol: scopes are opened
/// with `enter`/`exit`, loops with `begin`/`next`, switches with
/// `mark`/`unmark`. Only `accept` is required; everything else reports
/// [`ContextError::Unsupported`] or does nothing until implemented.
pub trait Context {
    /// Can this context evaluate code written for `context` (e.g. `py`)
    fn accept(&self, context: &str) -> bool;

    /// Execute a block of code, returning its textual result
    ///
    /// For image formats the result is the URL of the produced image.
    fn execute(
        &mut self,
        _code: &str,
        _id: &str,
        _format: &str,
        _width: &str,
        _height: &str,
        _units: &str,
    ) -> ContextResult<String> {
        Err(ContextError::unsupported("execute"))
    }

    /// Evaluate an expression to text
    fn write(&mut self, _expression: &str) -> ContextResult<String> {
        Err(ContextError::unsupported("write"))
    }

    /// Evaluate an expression to a boolean
    fn test(&mut self, _expression: &str) -> ContextResult<bool> {
        Err(ContextError::unsupported("test"))
    }

    /// Remember the subject of a switch
    fn mark(&mut self, _expression: &str) -> ContextResult<()> {
        Err(ContextError::unsupported("mark"))
    }

    /// Does `expression` equal the current mark
    fn matches(&mut self, _expression: &str) -> ContextResult<bool> {
        Err(ContextError::unsupported("match"))
    }

    fn unmark(&mut self) {}

    /// Start a loop over `items`, binding each to `item`
    ///
    /// Returns false when there is nothing to iterate over.
    fn begin(&mut self, _item: &str, _items: &str) -> ContextResult<bool> {
        Err(ContextError::unsupported("begin"))
    }

    /// Advance the innermost loop; false when it is exhausted
    fn next(&mut self) -> ContextResult<bool> {
        Err(ContextError::unsupported("next"))
    }

    /// Open a scope; an empty expression opens an anonymous one
    fn enter(&mut self, _expression: &str) -> ContextResult<()> {
        Err(ContextError::unsupported("enter"))
    }

    fn exit(&mut self) {}

    fn assign(&mut self, _name: &str, _expression: &str) -> ContextResult<()> {
        Err(ContextError::unsupported("assign"))
    }

    /// Bind a user supplied parameter value of the given type
    fn input(&mut self, _name: &str, _kind: &str, _value: &str) -> ContextResult<()> {
        Err(ContextError::unsupported("input"))
    }
}
