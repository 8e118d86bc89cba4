use crate::node::{Document, NodeId};

/// Tags rendered inline (phrasing content)
pub fn is_inline_tag(tag: &str) -> bool {
    matches!(
        tag,
        "a" | "abbr" | "b" | "bdi" | "bdo" | "br" | "button" |
        "cite" | "code" | "data" | "del" | "dfn" | "em" |
        "i" | "img" | "input" | "ins" | "kbd" | "label" |
        "mark" | "q" | "rp" | "rt" | "ruby" |
        "s" | "samp" | "script" | "select" | "small" | "span" | "strong" | "sub" | "sup" |
        "textarea" | "time" | "u" | "var" | "wbr"
    )
}

/// Tags without closing tags in HTML
pub fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag,
        "img"
            | "input"
            | "br"
            | "hr"
            | "meta"
            | "link"
            | "area"
            | "base"
            | "col"
            | "embed"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

pub fn is_inline_element(doc: &Document, id: NodeId) -> bool {
    doc.is_element(id) && is_inline_tag(doc.name(id))
}

pub fn is_block_element(doc: &Document, id: NodeId) -> bool {
    doc.is_element(id) && !is_inline_tag(doc.name(id))
}
