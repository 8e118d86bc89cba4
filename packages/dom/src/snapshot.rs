use crate::node::{Document, NodeId, NodeKind};

/// An owned, nested copy of a (sub)tree
///
/// Used to compare trees structurally and to build trees tersely.
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    Document(Vec<Snapshot>),
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        children: Vec<Snapshot>,
    },
    Text(String),
}

impl Snapshot {
    pub fn element(tag: impl Into<String>) -> Self {
        Snapshot::Element {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Snapshot::Text(content.into())
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Snapshot::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.push((name.into(), value.into()));
        }
        self
    }

    pub fn with_child(mut self, child: Snapshot) -> Self {
        match self {
            Snapshot::Element {
                ref mut children, ..
            }
            | Snapshot::Document(ref mut children) => children.push(child),
            Snapshot::Text(_) => {}
        }
        self
    }

    pub fn with_text(self, content: impl Into<String>) -> Self {
        self.with_child(Snapshot::text(content))
    }
}

impl Document {
    pub fn snapshot(&self, id: NodeId) -> Snapshot {
        let children = || -> Vec<Snapshot> {
            self.children(id)
                .iter()
                .map(|child| self.snapshot(*child))
                .collect()
        };
        match self.kind(id) {
            NodeKind::Document => Snapshot::Document(children()),
            NodeKind::Element { tag, attributes } => Snapshot::Element {
                tag: tag.clone(),
                attributes: attributes
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect(),
                children: children(),
            },
            NodeKind::Text { content } => Snapshot::Text(content.clone()),
        }
    }

    /// Build a document from a snapshot
    ///
    /// A `Snapshot::Document` supplies the top-level children; any other
    /// snapshot becomes the single top-level child.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut doc = Document::new();
        let root = doc.root();
        match snapshot {
            Snapshot::Document(children) => {
                for child in children {
                    doc.build(root, child);
                }
            }
            other => doc.build(root, other),
        }
        doc
    }

    fn build(&mut self, parent: NodeId, snapshot: &Snapshot) {
        match snapshot {
            Snapshot::Document(children) => {
                for child in children {
                    self.build(parent, child);
                }
            }
            Snapshot::Element {
                tag,
                attributes,
                children,
            } => {
                let id = self.append_element(parent, tag.clone());
                for (name, value) in attributes {
                    self.set_attr(id, name.clone(), value.clone());
                }
                for child in children {
                    self.build(id, child);
                }
            }
            Snapshot::Text(content) => {
                self.append_text(parent, content.clone());
            }
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.snapshot(self.root()) == other.snapshot(other.root())
    }
}
