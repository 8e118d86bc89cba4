//! # Stencil Evaluator
//!
//! Renders stencil documents by executing their directives against a
//! [`Context`], and provides the passes that clean rendered output.

pub mod cleanup;
pub mod context;
pub mod directives;
pub mod error;
pub mod evaluator;
pub mod hash;
pub mod map_context;
pub mod resolver;

#[cfg(test)]
mod tests_support;



#[cfg(test)]
mod tests_include;

#[cfg(test)]
mod tests_cleanup;


#[cfg(test)]
mod tests_map_context;

pub use cleanup::{clean, scrub, strip};
pub use context::Context;
pub use directives::{executes, parameters, Execute, Parameter};
pub use error::{
    ContextError, ContextResult, DirectiveError, DirectiveResult, RenderError, RenderResult,
};
pub use evaluator::{render, Evaluator};
pub use hash::{ContentHasher, Effect};
pub use map_context::MapContext;
pub use resolver::{MemoryResolver, Resolver};
