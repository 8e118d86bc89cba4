//! # Stencil HTML Compiler
//!
//! Writes a stencil document out as HTML. Directive and flag attributes are
//! kept as ordinary `data-*` attributes, so the output can be read back by
//! tools that understand them.

pub mod compiler;


pub use compiler::{compile_to_html, escape_html, CompileError, CompileOptions, CompileResult};
