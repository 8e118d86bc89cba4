//! Passes that remove rendering artifacts
//!
//! - [`clean`] undoes rendering: generated content and outcome flags go.
//! - [`scrub`] removes finished directives so a subtree renders as static
//!   content. Anything carrying `data-error` is left alone.
//! - [`strip`] is `scrub` followed by removal of every flag.

use std::iter;
use stencil_dom::vocabulary::{DIRECTIVES, FLAGS};
use stencil_dom::{Document, NodeId};

/// The node and its descendants in document order
fn subtree(doc: &Document, node: NodeId) -> Vec<NodeId> {
    iter::once(node).chain(doc.descendants(node)).collect()
}

pub fn clean(doc: &mut Document, node: NodeId) {
    for each in doc.filter_attr(node, "data-for") {
        let template = doc.first_element(each);
        for child in doc.children(each).to_vec() {
            if Some(child) != template {
                doc.destroy(child);
            }
        }
    }

    for generated in doc
        .descendants(node)
        .into_iter()
        .filter(|&id| doc.has_attr(id, "data-out") || doc.has_attr(id, "data-included"))
        .collect::<Vec<_>>()
    {
        doc.destroy(generated);
    }

    for filled in doc
        .descendants(node)
        .into_iter()
        .filter(|&id| {
            doc.has_attr(id, "data-text")
                || doc.has_attr(id, "data-refer")
                || doc.attr(id, "id") == Some("outline")
        })
        .collect::<Vec<_>>()
    {
        doc.clear(filled);
    }

    for id in subtree(doc, node) {
        for flag in ["data-error", "data-hash", "data-off", "data-index"] {
            doc.remove_attr(id, flag);
        }
    }
}

pub fn scrub(doc: &mut Document, node: NodeId) {
    let doomed: Vec<NodeId> = doc
        .descendants(node)
        .into_iter()
        .filter(|&id| {
            (doc.has_attr(id, "data-exec") || doc.has_attr(id, "data-off"))
                && !doc.has_attr(id, "data-error")
        })
        .collect();
    for id in doomed {
        doc.destroy(id);
    }

    for id in subtree(doc, node) {
        if doc.is_element(id) && !doc.has_attr(id, "data-error") {
            for directive in DIRECTIVES {
                doc.remove_attr(id, directive);
            }
        }
    }
}

pub fn strip(doc: &mut Document, node: NodeId) {
    scrub(doc, node);
    for id in subtree(doc, node) {
        for flag in FLAGS {
            doc.remove_attr(id, flag);
        }
    }
}
