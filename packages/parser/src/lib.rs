//! # Stencil Parser
//!
//! Cila to document compilation and document to Cila generation.

pub mod error;
pub mod parser;
pub mod serializer;

#[cfg(test)]
mod tests_parser;
#[cfg(test)]
mod tests_serializer;

pub use error::{ParseError, ParseResult};
pub use parser::{parse, try_parse, Parser};
pub use serializer::{serialize, Serializer};
