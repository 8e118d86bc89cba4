//! # Stencil DOM
//!
//! The node tree shared by the Cila parser, the Cila serializer and the
//! directive evaluator: an arena of document, element and text nodes with
//! ordered attributes, plus a small selector engine for querying it.

pub mod html;
pub mod node;
pub mod selector;
pub mod snapshot;
pub mod vocabulary;

pub use node::{Document, Node, NodeId, NodeKind};
pub use selector::{Selector, SelectorError, SelectorResult};
pub use snapshot::Snapshot;
pub use vocabulary::{is_directive, is_flag};
