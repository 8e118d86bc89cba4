use crate::parser::{continues_head, opens_block};
use stencil_dom::html::{is_block_element, is_inline_element, is_inline_tag};
use stencil_dom::vocabulary::ARGUMENTLESS;
use stencil_dom::{is_directive, is_flag, Document, NodeId, NodeKind};

/// Serializer converts a document back to Cila
///
/// Shorthands are used wherever the element satisfies their preconditions
/// exactly, so that compiling the output gives back the same tree. Anything
/// else is written in the canonical element form.
pub struct Serializer {
    output: String,
    /// Number of newlines at the end of the output so far
    newlines: usize,
    indent_string: String,
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Serializer {
    pub fn new() -> Self {
        Self::with_indent("\t")
    }

    pub fn with_indent(indent: &str) -> Self {
        Self {
            output: String::new(),
            newlines: 0,
            indent_string: indent.to_string(),
        }
    }

    /// Serialize a whole document
    pub fn serialize(mut self, doc: &Document) -> String {
        self.node(doc, doc.root(), "");
        self.output.trim().to_string()
    }

    fn content(&mut self, content: &str) {
        if content.is_empty() {
            return;
        }
        if content.chars().any(|c| c != '\n') {
            self.newlines = 0;
        }
        self.newlines += content.chars().rev().take_while(|c| *c == '\n').count();
        self.output.push_str(content);
    }

    /// Start a new line
    fn newline(&mut self, indent: &str) {
        if self.newlines < 1 {
            self.output.push('\n');
            self.newlines += 1;
        }
        self.output.push_str(indent);
    }

    /// Ensure a blank line
    fn blankline(&mut self) {
        while self.newlines < 2 {
            self.output.push('\n');
            self.newlines += 1;
        }
    }

    fn deeper(&self, indent: &str) -> String {
        format!("{}{}", indent, self.indent_string)
    }

    fn node(&mut self, doc: &Document, id: NodeId, indent: &str) {
        match doc.kind(id) {
            NodeKind::Document => self.children(doc, doc.children(id), true, ""),
            NodeKind::Element { .. } => self.element(doc, id, indent),
            NodeKind::Text { content } => {
                let text = content
                    .replace('`', "\\`")
                    .replace('|', "\\|")
                    .replace('@', "\\@")
                    .replace("&nbsp;", " ");
                self.content(&text);
            }
        }
    }

    /// Children, each block child on its own line
    ///
    /// `indent` is the indentation for the children themselves.
    fn children(&mut self, doc: &Document, children: &[NodeId], start_as_block: bool, indent: &str) {
        let mut previous_was_block = start_as_block;
        for &child in children {
            let child_is_block = is_block_element(doc, child);
            if !child_is_block && previous_was_block {
                self.newline(indent);
            }
            self.node(doc, child, indent);
            previous_was_block = child_is_block;
        }
    }

    fn element(&mut self, doc: &Document, id: NodeId, indent: &str) {
        if self.shorthand(doc, id, indent) {
            return;
        }

        let name = doc.name(id);
        let children = doc.children(id);
        let attributes = doc.attr_count(id);
        let mut attribute_list = doc.attr_names(id);

        let inline = is_inline_tag(name);
        let mut embedded = false;
        let isolated = matches!(name, "section" | "p" | "figure" | "table" | "style")
            || [
                "data-exec",
                "data-when",
                "data-with",
                "data-for",
                "data-switch",
                "data-include",
                "data-macro",
            ]
            .iter()
            .any(|attr| doc.has_attr(id, attr));
        if isolated {
            self.blankline();
        }

        let mut space_required = false;
        // Can children trail on the element's starting line?
        let mut trailing_allowed = true;

        if inline {
            self.content("{");
        } else {
            self.newline(indent);
        }

        if let Some(command) = doc.attr(id, "data-exec") {
            self.content(command);
            space_required = true;
            attribute_list.retain(|attr| attr != "data-exec");
            embedded = true;
        } else if doc.has_attr(id, "data-out") {
            self.content("out");
            space_required = true;
            attribute_list.retain(|attr| attr != "data-out");
        } else if name == "style" {
            self.content("css");
            space_required = true;
            attribute_list.retain(|attr| attr != "type");
            embedded = true;
        } else if name == "div" {
            // Only needed when nothing else would imply it
            let flags = attribute_list.iter().filter(|attr| is_flag(attr)).count();
            if attributes == 0
                || flags == attributes
                || doc.has_attr(id, "data-text")
                || doc.has_attr(id, "data-refer")
            {
                self.content(name);
                space_required = true;
            }
        } else if name == "span" {
            if !(doc.has_attr(id, "data-text") || doc.has_attr(id, "data-refer")) {
                self.content(name);
                space_required = true;
            }
        } else {
            self.content(name);
            space_required = true;
        }

        let mut directive: Option<(&str, &str)> = None;
        let mut flags: Vec<(&str, &str)> = Vec::new();
        for attr in &attribute_list {
            let attr = attr.as_str();
            let Some(value) = doc.attr(id, attr) else {
                continue;
            };
            if is_directive(attr) {
                directive = Some((attr, value));
            } else if is_flag(attr) {
                flags.push((attr, value));
            } else {
                if space_required {
                    self.content(" ");
                }
                match attr {
                    "id" => self.content(&format!("#{}", value)),
                    "class" => {
                        let classes: Vec<String> = value
                            .split(' ')
                            .map(|class| {
                                if class.is_empty() {
                                    String::new()
                                } else {
                                    format!(".{}", class)
                                }
                            })
                            .collect();
                        self.content(&classes.join(" "));
                    }
                    _ => self.content(&format!("[{}={}]", attr, value)),
                }
                space_required = true;
            }
        }

        if let Some((attr, value)) = directive {
            if space_required {
                self.content(" ");
            }
            self.content(&attr["data-".len()..]);
            if !ARGUMENTLESS.contains(&attr) {
                self.content(&format!(" {}", value));
            }
            space_required = true;
            trailing_allowed = false;
        }

        if !flags.is_empty() {
            if space_required {
                self.content(" ");
            }
            self.content("~");
            trailing_allowed = false;
            for (attr, value) in flags {
                let flag = match attr {
                    "data-hash" => format!("&{}", value),
                    "data-index" => format!("^{}", value),
                    "data-error" | "data-warning" => {
                        let sigil = if attr == "data-error" { '!' } else { '%' };
                        let mut parts = value.splitn(2, '@');
                        let message = parts.next().unwrap_or_default().replace('"', "'");
                        match parts.next() {
                            Some(location) => format!("{}\"{}\"@{}", sigil, message, location),
                            None => format!("{}\"{}\"", sigil, message),
                        }
                    }
                    _ => attr["data-".len()..].to_string(),
                };
                self.content(&format!(" {}", flag));
            }
        }

        if !children.is_empty() {
            if inline {
                self.content(" ");
                if trailing_allowed {
                    self.trailing(doc, children);
                } else {
                    self.content(": ");
                    self.children(doc, children, false, "");
                }
            } else if !embedded {
                let has_block_children = children.iter().any(|&child| is_block_element(doc, child));
                if trailing_allowed && !has_block_children {
                    self.content(" ");
                    self.trailing(doc, children);
                } else {
                    let deeper = self.deeper(indent);
                    self.children(doc, children, true, &deeper);
                }
            } else {
                let code: String = children.iter().map(|&child| doc.text(child)).collect();
                let code = code.trim();
                if !code.is_empty() {
                    let deeper = self.deeper(indent);
                    for line in code.split('\n') {
                        if line.is_empty() {
                            self.blankline();
                        } else {
                            self.newline(&deeper);
                            self.content(line);
                        }
                    }
                }
            }
        }

        if inline {
            self.content("}");
        } else if isolated {
            self.blankline();
        }
    }

    /// Children trailing an element head on the same line
    ///
    /// Separated with `: ` when they would otherwise read as part of the head.
    fn trailing(&mut self, doc: &Document, children: &[NodeId]) {
        let start = self.output.len();
        self.children(doc, children, false, "");
        if continues_head(&self.output[start..]) {
            self.output.insert_str(start, ": ");
        }
    }

    /// Write a shorthand form when one applies
    fn shorthand(&mut self, doc: &Document, id: NodeId, indent: &str) -> bool {
        let name = doc.name(id);
        let children = doc.children(id);
        let attributes = doc.attr_count(id);

        // Reference
        if name == "span" && children.is_empty() && attributes == 1 {
            if let Some(target) = doc.attr(id, "data-refer").and_then(|v| v.strip_prefix('#')) {
                if !target.is_empty() && !target.chars().any(char::is_whitespace) {
                    self.content(&format!("@{}", target));
                    return true;
                }
            }
        }

        // Emphasis and strong
        if (name == "em" || name == "strong") && attributes == 0 {
            let delimiter = if name == "em" { "_" } else { "*" };
            self.content(delimiter);
            self.children(doc, children, false, "");
            self.content(delimiter);
            return true;
        }

        if name == "code" && attributes == 0 {
            self.content(&format!("`{}`", doc.text(id).replace('`', "\\`")));
            return true;
        }

        // Inline math
        if name == "script" {
            match doc.attr(id, "type") {
                Some("math/asciimath") => {
                    let code = doc.text(id).trim().replace('|', "\\|");
                    self.content(&format!("|{}|", code));
                    return true;
                }
                Some("math/tex") => {
                    self.content(&format!("\\({}\\)", doc.text(id).trim()));
                    return true;
                }
                _ => {}
            }
        }

        // Links, autolinks and autoemails
        if name == "a" && attributes == 1 {
            if let Some(href) = doc.attr(id, "href") {
                let text = doc.text(id);
                if text == href || href.strip_prefix("mailto:") == Some(text.as_str()) {
                    self.content(&text);
                } else {
                    self.content(&format!("[{}]({})", text, href));
                }
                return true;
            }
        }

        // Lists whose items have no attributes
        if (name == "ul" || name == "ol")
            && attributes == 0
            && !children.is_empty()
            && children.iter().all(|&child| doc.attr_count(child) == 0)
        {
            self.blankline();
            let deeper = self.deeper(indent);
            for (index, &item) in children.iter().enumerate() {
                self.newline(indent);
                if name == "ol" {
                    self.content(&format!("{}. ", index + 1));
                } else {
                    self.content("- ");
                }
                self.children(doc, doc.children(item), false, &deeper);
            }
            self.blankline();
            return true;
        }

        // Plain paragraph with only inline content
        if name == "p"
            && attributes == 0
            && !children.is_empty()
            && children
                .iter()
                .all(|&child| doc.is_text(child) || is_inline_element(doc, child))
        {
            self.blankline();
            self.newline(indent);
            let start = self.output.len();
            self.children(doc, children, false, "");
            if opens_block(&self.output[start..]) {
                self.output.insert_str(start, "p : ");
            }
            self.blankline();
            return true;
        }

        // Display equation
        if name == "p" && doc.attr(id, "class") == Some("equation") {
            if let Some(script) = doc.select_tag(id, "script") {
                if let Some(kind) = doc.attr(script, "type").filter(|kind| !kind.is_empty()) {
                    let code = doc.text(script).trim().to_string();
                    let line = if kind.contains("math/asciimath") {
                        format!("|{}|", code.replace('|', "\\|"))
                    } else {
                        format!("\\({}\\)", code)
                    };
                    self.blankline();
                    self.newline(indent);
                    self.content(&line);
                    self.blankline();
                    return true;
                }
            }
        }

        // Section whose id matches its heading
        if name == "section" && attributes == 1 {
            let first = children.first().copied();
            if let (Some(section_id), Some(h1)) = (
                doc.attr(id, "id").filter(|id| !id.is_empty()),
                first.filter(|&first| doc.name(first) == "h1"),
            ) {
                let title = doc.text(h1);
                let expected = title.trim().to_lowercase().replace(' ', "-");
                if section_id == expected {
                    self.blankline();
                    self.newline(indent);
                    self.content(&format!("> {}", title.trim()));
                    let rest: Vec<NodeId> = children
                        .iter()
                        .copied()
                        .filter(|&child| child != h1)
                        .collect();
                    let deeper = self.deeper(indent);
                    self.children(doc, &rest, true, &deeper);
                    return true;
                }
            }
        }

        false
    }
}

/// Generate Cila for a document
pub fn serialize(doc: &Document) -> String {
    Serializer::new().serialize(doc)
}
