use crate::selector::Selector;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Index of a node inside its owning [`Document`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a node is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    /// Root container
    Document,

    /// Element with a tag name and ordered attributes
    Element {
        tag: String,
        attributes: IndexMap<String, String>,
    },

    /// Text node
    Text { content: String },
}

/// A slot in the arena
///
/// `parent` is a positional back-link only; ownership flows strictly
/// from parent to `children`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// A mutable node tree stored in an arena
///
/// The root (a `NodeKind::Document`) always lives at index 0. Destroyed
/// nodes are detached and stay in the arena unreachable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Document)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn is_document(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Document)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Element { .. })
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Text { .. })
    }

    /// Tag name of an element, empty for other kinds
    pub fn name(&self, id: NodeId) -> &str {
        match self.kind(id) {
            NodeKind::Element { tag, .. } => tag,
            _ => "",
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|child| self.is_element(*child))
            .collect()
    }

    pub fn first_element(&self, id: NodeId) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|child| self.is_element(*child))
    }

    /// Position of a node within its parent's children
    pub fn position(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|child| *child == id)
    }

    /// Next sibling that is an element
    pub fn next_element(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let position = self.position(id)?;
        self.children(parent)[position + 1..]
            .iter()
            .copied()
            .find(|sibling| self.is_element(*sibling))
    }

    /// Is `node` attached to the tree under `root`
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current == self.root()
    }

    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// All descendants of a node in document order (the node itself excluded)
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Descendant elements matching a selector, in document order
    pub fn filter(&self, id: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|node| selector.matches(self, *node))
            .collect()
    }

    /// First descendant element matching a selector
    pub fn select(&self, id: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(id)
            .into_iter()
            .find(|node| selector.matches(self, *node))
    }

    /// Descendant elements carrying an attribute
    pub fn filter_attr(&self, id: NodeId, name: &str) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|node| self.has_attr(*node, name))
            .collect()
    }

    /// First descendant element whose tag is `tag`
    pub fn select_tag(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(id)
            .into_iter()
            .find(|node| self.name(*node) == tag)
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    pub fn attributes(&self, id: NodeId) -> Option<&IndexMap<String, String>> {
        match self.kind(id) {
            NodeKind::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    pub fn attr_names(&self, id: NodeId) -> Vec<String> {
        self.attributes(id)
            .map(|attributes| attributes.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn attr_count(&self, id: NodeId) -> usize {
        self.attributes(id).map(IndexMap::len).unwrap_or(0)
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)
            .and_then(|attributes| attributes.get(name))
            .map(String::as_str)
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    /// Set an attribute, keeping its position if it already exists
    pub fn set_attr(&mut self, id: NodeId, name: impl Into<String>, value: impl Into<String>) {
        if let NodeKind::Element { attributes, .. } = &mut self.nodes[id.0].kind {
            attributes.insert(name.into(), value.into());
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.nodes[id.0].kind {
            attributes.shift_remove(name);
        }
    }

    /// Append a space separated token (e.g. a class) to an attribute
    pub fn concat_attr(&mut self, id: NodeId, name: &str, value: &str) {
        let joined = match self.attr(id, name) {
            Some(existing) if !existing.is_empty() => format!("{} {}", existing, value),
            _ => value.to_string(),
        };
        self.set_attr(id, name, joined);
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Concatenated text of a node and its descendants
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            NodeKind::Text { content } => out.push_str(content),
            _ => {
                for child in self.children(id) {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    /// Replace all children with a single text node
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.clear(id);
        let text = text.into();
        if !text.is_empty() {
            self.append_text(id, text);
        }
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind));
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.into(),
            attributes: IndexMap::new(),
        })
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text {
            content: content.into(),
        })
    }

    pub fn append_element(&mut self, parent: NodeId, tag: impl Into<String>) -> NodeId {
        let id = self.create_element(tag);
        self.append_child(parent, id);
        id
    }

    pub fn append_element_with(
        &mut self,
        parent: NodeId,
        tag: impl Into<String>,
        attributes: &[(&str, &str)],
    ) -> NodeId {
        let id = self.append_element(parent, tag);
        for (name, value) in attributes {
            self.set_attr(id, *name, *value);
        }
        id
    }

    pub fn append_text(&mut self, parent: NodeId, content: impl Into<String>) -> NodeId {
        let id = self.create_text(content);
        self.append_child(parent, id);
        id
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Detach a node from its parent (it keeps its own subtree)
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|child| *child != id);
        }
    }

    /// Remove a node from the tree
    pub fn destroy(&mut self, id: NodeId) {
        if id != self.root() {
            self.detach(id);
        }
    }

    /// Remove all children of a node
    pub fn clear(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_child(parent, 0, child);
    }

    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
    }

    /// Insert `child` as the sibling immediately before `target`
    pub fn insert_before(&mut self, target: NodeId, child: NodeId) {
        self.detach(child);
        if let (Some(parent), Some(position)) = (self.parent(target), self.position(target)) {
            self.insert_child(parent, position, child);
        }
    }

    /// Insert `child` as the sibling immediately after `target`
    pub fn insert_after(&mut self, target: NodeId, child: NodeId) {
        self.detach(child);
        if let (Some(parent), Some(position)) = (self.parent(target), self.position(target)) {
            self.insert_child(parent, position + 1, child);
        }
    }

    /// Move a node to be the last child of `parent`
    pub fn move_to_end(&mut self, id: NodeId, parent: NodeId) {
        self.append_child(parent, id);
    }

    /// Deep copy a node of this document; the copy is detached
    pub fn duplicate(&mut self, id: NodeId) -> NodeId {
        let kind = self.kind(id).clone();
        let copy = self.push(kind);
        for child in self.children(id).to_vec() {
            let child_copy = self.duplicate(child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    /// Deep copy a node of another document into this one; the copy is detached
    ///
    /// Copying a document root yields a detached `div` holding its children.
    pub fn import(&mut self, other: &Document, id: NodeId) -> NodeId {
        let kind = match other.kind(id) {
            NodeKind::Document => NodeKind::Element {
                tag: "div".to_string(),
                attributes: IndexMap::new(),
            },
            kind => kind.clone(),
        };
        let copy = self.push(kind);
        for child in other.children(id) {
            let child_copy = self.import(other, *child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    /// Number of live (attached) nodes, the root included
    pub fn len(&self) -> usize {
        1 + self.descendants(self.root()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.children(self.root()).is_empty()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
