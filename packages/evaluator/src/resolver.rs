use std::collections::HashMap;
use stencil_dom::Document;

/// Finds the documents named by `include` directives
pub trait Resolver {
    fn resolve(&self, address: &str) -> Option<Document>;
}

/// A resolver over documents held in memory
#[derive(Default)]
pub struct MemoryResolver {
    documents: HashMap<String, Document>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, address: impl Into<String>, doc: Document) {
        self.documents.insert(address.into(), doc);
    }

    /// Compile Cila and register the result under `address`
    pub fn insert_cila(&mut self, address: impl Into<String>, source: &str) {
        self.insert(address, stencil_parser::parse(source));
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl Resolver for MemoryResolver {
    fn resolve(&self, address: &str) -> Option<Document> {
        self.documents.get(address).cloned()
    }
}
