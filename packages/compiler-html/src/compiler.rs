use serde::{Deserialize, Serialize};
use stencil_dom::html::{is_block_element, is_void_tag};
use stencil_dom::{Document, NodeId, NodeKind};
use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

/// Errors that can occur during HTML compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Invalid tag name '{0}'")]
    InvalidTag(String),

    #[error("Invalid attribute name '{name}' on <{tag}>")]
    InvalidAttribute { tag: String, name: String },
}

/// Options for HTML compilation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// Wrap the content in a complete page
    pub standalone: bool,
    /// Page title when standalone
    pub title: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: "  ".to_string(),
            standalone: false,
            title: "Stencil".to_string(),
        }
    }
}

struct Context<'a> {
    options: &'a CompileOptions,
    depth: usize,
    buffer: String,
}

impl<'a> Context<'a> {
    fn new(options: &'a CompileOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn newline(&mut self) {
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Compile a stencil document to HTML
pub fn compile_to_html(document: &Document, options: &CompileOptions) -> CompileResult<String> {
    let mut ctx = Context::new(options);

    if options.standalone {
        ctx.add_line("<!DOCTYPE html>");
        ctx.add_line("<html>");
        ctx.indent();
        compile_head(&mut ctx);
        ctx.add_line("<body>");
        ctx.indent();
    }

    compile_children(document, document.root(), &mut ctx)?;

    if options.standalone {
        ctx.dedent();
        ctx.add_line("</body>");
        ctx.dedent();
        ctx.add_line("</html>");
    }

    Ok(ctx.get_output())
}

fn compile_head(ctx: &mut Context) {
    ctx.add_line("<head>");
    ctx.indent();
    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    let title = format!("<title>{}</title>", escape_html(&ctx.options.title));
    ctx.add_line(&title);
    ctx.dedent();
    ctx.add_line("</head>");
}

/// Children go on their own lines only when every one of them is a block
fn compile_children(doc: &Document, id: NodeId, ctx: &mut Context) -> CompileResult<()> {
    let children = doc.children(id);
    let block = ctx.options.pretty && has_only_block_children(doc, children);
    for &child in children {
        compile_node(doc, child, ctx, block)?;
    }
    Ok(())
}

fn compile_node(doc: &Document, id: NodeId, ctx: &mut Context, block: bool) -> CompileResult<()> {
    match doc.kind(id) {
        NodeKind::Document => compile_children(doc, id, ctx),
        NodeKind::Text { content } => {
            ctx.add(&escape_html(content));
            Ok(())
        }
        NodeKind::Element { tag, attributes } => {
            if !is_valid_name(tag) {
                return Err(CompileError::InvalidTag(tag.clone()));
            }
            if block {
                ctx.add_indent();
            }
            ctx.add(&format!("<{}", tag));
            for (name, value) in attributes {
                if !is_valid_name(name) {
                    return Err(CompileError::InvalidAttribute {
                        tag: tag.clone(),
                        name: name.clone(),
                    });
                }
                ctx.add(&format!(" {}=\"{}\"", name, escape_html(value)));
            }

            let children = doc.children(id);
            if children.is_empty() && is_void_tag(tag) {
                ctx.add(" />");
                if block {
                    ctx.newline();
                }
                return Ok(());
            }
            ctx.add(">");

            if is_raw_text(tag) {
                // Scripts and styles are written as is
                ctx.add(&doc.text(id));
            } else if ctx.options.pretty && has_only_block_children(doc, children) {
                ctx.newline();
                ctx.indent();
                compile_children(doc, id, ctx)?;
                ctx.dedent();
                ctx.add_indent();
            } else {
                compile_children(doc, id, ctx)?;
            }

            ctx.add(&format!("</{}>", tag));
            if block {
                ctx.newline();
            }
            Ok(())
        }
    }
}

fn has_only_block_children(doc: &Document, children: &[NodeId]) -> bool {
    !children.is_empty() && children.iter().all(|&child| is_block_element(doc, child))
}

fn is_raw_text(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '>' | '/' | '=' | '<'))
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
