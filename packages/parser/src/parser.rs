//! # Cila Parser
//!
//! Compiles Cila, an indentation sensitive shorthand for stencils, into a
//! [`Document`].
//!
//! The parser is a pushdown state machine scanning the input once from left
//! to right. At every step the patterns of the current state are tried in a
//! fixed order, anchored at the cursor, and the first match wins. Characters
//! that match no pattern accumulate in a buffer which becomes a text node at
//! the next structural event (entering or exiting an element, end of input).
//!
//! Alongside the state stack the parser keeps a stack of frames, each one an
//! element together with the indentation of the line it was opened on.
//! Elements opened inside running text are inline frames and are closed at
//! the start of the next line.

use crate::error::{ParseError, ParseResult};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use stencil_dom::{Document, NodeId};
use tracing::{debug, warn};

/// Tags recognised at the start of a line or after `{`
const TAGS: &str = "section|nav|article|aside|address|h1|h2|h3|h4|h5|h6|p|hr|pre|blockquote|ol|ul|li|dl|dt|dd|\
figure|figcaption|div|a|em|strong|small|s|cite|q|dfn|abbr|data|time|code|var|samp|kbd|sub|sup|i|b|u|mark|ruby|\
rt|rp|bdi|bdo|span|br|wbr|ins|del|table|caption|colgroup|col|tbody|thead|tfoot|tr|td|th|\
img|svg|\
form|fieldset|label|input|select|textarea|button";

/// Directives taking a mandatory argument
const ARGUMENT_DIRECTIVES: &str = "when|refer|attr|text|icon|with|if|elif|switch|case|for|include|\
delete|replace|change|before|after|prepend|append|macro|par|set|comment";

struct Patterns {
    indentation: Regex,
    blankline: Regex,
    tag: Regex,
    section: Regex,
    ul_item: Regex,
    ol_item: Regex,
    exec_open: Regex,
    out: Regex,
    style_open: Regex,
    attr: Regex,
    id: Regex,
    class: Regex,
    directive_noarg: Regex,
    directive_arg_optional: Regex,
    directive_arg: Regex,
    spaces: Regex,
    hash: Regex,
    index: Regex,
    error: Regex,
    warning: Regex,
    lock: Regex,
    off: Regex,
    included: Regex,
    extra: Regex,
    link: Regex,
    autolink: Regex,
    autoemail: Regex,
    refer: Regex,
}

fn pattern(source: &str) -> Regex {
    Regex::new(&format!("^(?:{})", source)).expect("static pattern")
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(|| Patterns {
    indentation: pattern(r"[ \t]*"),
    blankline: pattern(r"[ \t]*\n"),
    tag: pattern(&format!(r"({})\b", TAGS)),
    section: pattern(r">[ \t]*([ \w-]+)"),
    ul_item: pattern(r"-[ \t]*"),
    ol_item: pattern(r"\d+\.[ \t]*"),
    exec_open: pattern(r"(exec|js|r|py)\b([^\n]*)"),
    out: pattern(r"out\b"),
    style_open: pattern(r"(?:style|css)\n"),
    attr: pattern(r"\[([\w-]+)=(.+?)\]"),
    id: pattern(r"#([\w-]+)\b"),
    class: pattern(r"\.([\w-]+)\b"),
    directive_noarg: pattern(r"(each|else|default)\b( *)"),
    directive_arg_optional: pattern(r"(comments)\b"),
    directive_arg: pattern(&format!(r"({})\b", ARGUMENT_DIRECTIVES)),
    spaces: pattern(r" +"),
    hash: pattern(r"&([a-zA-Z0-9]+)"),
    index: pattern(r"\^(\d+)"),
    error: pattern(r#"!"([^"]*)"(@(\d+(,\d+)?))?"#),
    warning: pattern(r#"%"([^"]*)"(@(\d+(,\d+)?))?"#),
    lock: pattern(r"lock\b"),
    off: pattern(r"off\b"),
    included: pattern(r"included\b"),
    extra: pattern(r"extra\b"),
    link: pattern(r"\[([^\]]*)\]\(([^)]+)\)"),
    autolink: pattern(r"\bhttps?://\S+\b"),
    autoemail: pattern(r"[a-zA-Z0-9_-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9]+"),
    refer: pattern(r"@([\w-]+)\b"),
});

fn group<'a>(captures: &Captures<'a>, index: usize) -> &'a str {
    captures.get(index).map_or("", |m| m.as_str())
}

/// Does a directive argument end at byte `at` of `rest`?
fn argument_ends(rest: &str, at: usize) -> bool {
    let tail = &rest[at..];
    tail.is_empty()
        || tail.starts_with(" ~ ")
        || tail.starts_with(" : ")
        || tail.starts_with('\n')
        || tail.starts_with('{')
        || tail.starts_with('}')
}

/// End of the shortest directive argument starting at `start`
///
/// Arguments never span lines. When `required` the argument is at least
/// one character long.
fn argument_end(rest: &str, start: usize, required: bool) -> Option<usize> {
    for (offset, c) in rest[start..].char_indices() {
        let at = start + offset;
        if (offset > 0 || !required) && argument_ends(rest, at) {
            return Some(at);
        }
        if c == '\n' {
            return None;
        }
    }
    if rest.len() > start || !required {
        Some(rest.len())
    } else {
        None
    }
}

/// Is the first character of `text` something other than whitespace?
fn starts_solid(text: &str) -> bool {
    text.chars().next().is_some_and(|c| !c.is_whitespace())
}

/// Would `text`, following an element head, be read as more of the head?
pub(crate) fn continues_head(text: &str) -> bool {
    let patterns = &*PATTERNS;
    text.starts_with(char::is_whitespace)
        || text.starts_with("~ ")
        || text.starts_with(": ")
        || [
            &patterns.attr,
            &patterns.id,
            &patterns.class,
            &patterns.directive_noarg,
            &patterns.directive_arg_optional,
            &patterns.directive_arg,
        ]
        .iter()
        .any(|re| re.is_match(text))
}

/// Would `text`, at the start of a line, be read as anything other than
/// paragraph text?
pub(crate) fn opens_block(text: &str) -> bool {
    let patterns = &*PATTERNS;
    text.starts_with('|')
        || text.starts_with("\\(")
        || [
            &patterns.exec_open,
            &patterns.out,
            &patterns.style_open,
            &patterns.tag,
            &patterns.section,
            &patterns.ul_item,
            &patterns.ol_item,
        ]
        .iter()
        .any(|re| re.is_match(text))
        || continues_head(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StartOfLine,
    Element,
    Attributes,
    Flags,
    Text,
    Emphasis,
    Strong,
    Code,
    AsciiMath,
    Tex,
    Embed,
}

/// An open element and the indentation of the line that opened it
///
/// `indent` is `None` for inline elements.
#[derive(Debug, Clone, Copy)]
struct Frame {
    node: NodeId,
    indent: Option<usize>,
}

pub struct Parser<'src> {
    input: &'src str,
    pos: usize,
    states: Vec<State>,
    frames: Vec<Frame>,
    doc: Document,
    node: NodeId,
    indent: Option<usize>,
    buffer: String,
    bilge: String,
    tag_needed: bool,
    para_needed: bool,
}

impl<'src> Parser<'src> {
    pub fn new(input: &'src str) -> Self {
        let doc = Document::new();
        let root = doc.root();
        Self {
            input,
            pos: 0,
            states: vec![State::StartOfLine],
            frames: vec![Frame {
                node: root,
                indent: Some(0),
            }],
            doc,
            node: root,
            indent: Some(0),
            buffer: String::new(),
            bilge: String::new(),
            tag_needed: false,
            // Plain text at the very start is a paragraph
            para_needed: true,
        }
    }

    /// Run the state machine over the whole input
    pub fn parse(mut self) -> ParseResult<Document> {
        while self.pos < self.input.len() {
            match self.state() {
                State::StartOfLine => self.start_of_line(),
                State::Element => self.element(),
                State::Attributes => self.attributes(),
                State::Flags => self.flags()?,
                State::Text => self.text()?,
                State::Emphasis => self.emphasis()?,
                State::Strong => self.strong()?,
                State::Code => self.code()?,
                State::AsciiMath => self.ascii_math()?,
                State::Tex => self.tex()?,
                State::Embed => self.embed(),
            }
        }
        self.flush();
        debug!(nodes = self.doc.len(), "Parsed Cila");
        Ok(self.doc)
    }

    fn rest(&self) -> &'src str {
        &self.input[self.pos..]
    }

    /// Match a pattern at the cursor, consuming it
    fn matched(&mut self, re: &Regex) -> Option<Captures<'src>> {
        let captures = re.captures(self.rest())?;
        self.pos += captures.get(0).map_or(0, |m| m.end());
        Some(captures)
    }

    /// Match a literal at the cursor, consuming it
    fn literal(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    fn state(&self) -> State {
        self.states.last().copied().unwrap_or(State::Text)
    }

    fn push(&mut self, state: State) {
        self.states.push(state);
    }

    fn pop(&mut self, found: &str) -> ParseResult<()> {
        if self.states.len() < 2 {
            return Err(ParseError::unbalanced(self.pos, found));
        }
        self.states.pop();
        Ok(())
    }

    fn across(&mut self, state: State) {
        if let Some(top) = self.states.last_mut() {
            *top = state;
        }
    }

    /// Move the next character into the buffer
    fn add(&mut self) {
        if let Some(c) = self.rest().chars().next() {
            self.buffer.push(c);
            self.pos += c.len_utf8();
        }
    }

    fn flush(&mut self) {
        if !self.buffer.is_empty() {
            let text = std::mem::take(&mut self.buffer);
            self.doc.append_text(self.node, text);
        }
    }

    /// Append a new element to the current node and enter it
    fn enter(&mut self, tag: &str) -> NodeId {
        self.flush();
        let node = self.doc.append_element(self.node, tag);
        self.enter_node(node);
        node
    }

    fn enter_node(&mut self, node: NodeId) {
        self.node = node;
        self.frames.push(Frame {
            node,
            indent: self.indent,
        });
        self.tag_needed = false;
        self.para_needed = false;
    }

    fn enter_if_needed(&mut self, tag: &str) {
        if self.tag_needed {
            self.enter(tag);
        }
    }

    fn exit(&mut self) {
        self.flush();
        if self.frames.len() > 1 {
            self.frames.pop();
        }
        self.node = self
            .frames
            .last()
            .map_or_else(|| self.doc.root(), |frame| frame.node);
    }

    fn exit_pop(&mut self, found: &str) -> ParseResult<()> {
        self.exit();
        self.pop(found)
    }

    fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let node = self.node;
        self.doc.set_attr(node, name, value);
    }

    /// Append a `script` of the given type and push into its content state
    fn script(&mut self, within: Option<&str>, kind: &str, state: State) {
        self.flush();
        let mut parent = self.node;
        if let Some(tag) = within {
            parent = self
                .doc
                .append_element_with(parent, tag, &[("class", "equation")]);
        }
        let script = self
            .doc
            .append_element_with(parent, "script", &[("type", kind)]);
        self.enter_node(script);
        self.push(state);
    }

    fn start_of_line(&mut self) {
        let patterns = &*PATTERNS;
        if !patterns.blankline.is_match(self.rest()) {
            let indent = self
                .matched(&patterns.indentation)
                .map_or(0, |captures| group(&captures, 0).len());
            self.indent = Some(indent);
            self.close_frames(indent);
        }

        if let Some(command) = self.exec_open() {
            self.enter("pre");
            self.set_attr("data-exec", command);
            self.across(State::Embed);
        } else if self.matched(&patterns.out).is_some() {
            self.enter("div");
            self.set_attr("data-out", "true");
            self.across(State::Attributes);
        } else if self.matched(&patterns.style_open).is_some() {
            self.enter("style");
            self.set_attr("type", "text/css");
            self.buffer.push('\n');
            self.across(State::Embed);
        } else if self.matched(&patterns.blankline).is_some() {
            self.para_needed = true;
        } else {
            self.across(State::Element);
        }
    }

    /// Exit frames that the line at `indent` is not nested within
    fn close_frames(&mut self, indent: usize) {
        let ul_item = PATTERNS.ul_item.is_match(self.rest());
        let ol_item = PATTERNS.ol_item.is_match(self.rest());
        while self.frames.len() > 1 {
            let Some(frame) = self.frames.last().copied() else {
                break;
            };
            if let Some(level) = frame.indent {
                if indent > level {
                    break;
                }
                // Keep the list open for a sibling item
                let name = self.doc.name(frame.node);
                if indent == level && ((ul_item && name == "ul") || (ol_item && name == "ol")) {
                    break;
                }
            }
            self.exit();
        }
    }

    /// An execution opener: language then arguments up to any flags
    fn exec_open(&mut self) -> Option<String> {
        let captures = PATTERNS.exec_open.captures(self.rest())?;
        let language = group(&captures, 1);
        let tail = group(&captures, 2);
        let tail = &tail[..tail.find(" ~ ").unwrap_or(tail.len())];
        self.pos += language.len() + tail.len();
        let tail = tail.trim();
        Some(if tail.is_empty() {
            language.to_string()
        } else {
            format!("{} {}", language, tail)
        })
    }

    fn element(&mut self) {
        let patterns = &*PATTERNS;
        if let Some(captures) = self.matched(&patterns.tag) {
            self.enter(group(&captures, 1));
            self.across(State::Attributes);
        } else if let Some(captures) = self.matched(&patterns.section) {
            self.flush();
            let title = group(&captures, 1).trim();
            let id = title.to_lowercase().replace(' ', "-");
            let section = self
                .doc
                .append_element_with(self.node, "section", &[("id", id.as_str())]);
            let h1 = self.doc.append_element(section, "h1");
            self.doc.append_text(h1, title);
            self.enter_node(section);
            self.across(State::Element);
        } else if self.matched(&patterns.ul_item).is_some() {
            self.list_item("ul");
        } else if self.matched(&patterns.ol_item).is_some() {
            self.list_item("ol");
        } else if self.literal("|") {
            self.script(Some("p"), "math/asciimath; mode=display", State::AsciiMath);
        } else if self.literal("\\(") {
            self.script(Some("p"), "math/tex; mode=display", State::Tex);
        } else {
            self.tag_needed = true;
            self.across(State::Attributes);
        }
    }

    fn list_item(&mut self, list: &str) {
        if self.doc.name(self.node) != list {
            self.enter(list);
        }
        self.enter("li");
        self.across(State::Text);
    }

    fn attributes(&mut self) {
        let patterns = &*PATTERNS;
        if let Some(captures) = self.matched(&patterns.attr) {
            self.enter_if_needed("div");
            self.set_attr(group(&captures, 1), group(&captures, 2));
        } else if let Some(captures) = self.matched(&patterns.id) {
            self.enter_if_needed("div");
            self.set_attr("id", group(&captures, 1));
        } else if let Some(captures) = self.matched(&patterns.class) {
            self.enter_if_needed("div");
            let node = self.node;
            self.doc.concat_attr(node, "class", group(&captures, 1));
        } else if let Some(name) = self.directive_noarg() {
            self.enter_if_needed("div");
            self.set_attr(format!("data-{}", name), "true");
        } else if let Some((name, argument)) = self.directive(&patterns.directive_arg_optional, false)
        {
            self.enter_if_needed("div");
            self.set_attr(format!("data-{}", name), argument);
        } else if let Some((name, argument)) = self.directive(&patterns.directive_arg, true) {
            let tag = if name == "text" || name == "refer" {
                "span"
            } else {
                "div"
            };
            self.enter_if_needed(tag);
            self.set_attr(format!("data-{}", name), argument);
        } else if self.literal(" ~ ") {
            self.enter_if_needed("div");
            self.across(State::Flags);
        } else if self.literal(" : ") {
            self.across(State::Text);
        } else if self.matched(&patterns.spaces).is_none() {
            self.across(State::Text);
        }
    }

    /// An argument-less directive, trailing spaces included when an
    /// argument terminator follows them
    fn directive_noarg(&mut self) -> Option<&'src str> {
        let rest = self.rest();
        let captures = PATTERNS.directive_noarg.captures(rest)?;
        let name = captures.get(1)?;
        let spaces = group(&captures, 2).len();
        let end = (0..=spaces)
            .rev()
            .map(|count| name.end() + count)
            .find(|at| argument_ends(rest, *at))?;
        self.pos += end;
        Some(name.as_str())
    }

    /// A directive name followed by its (trimmed) argument
    fn directive(&mut self, re: &Regex, required: bool) -> Option<(&'src str, String)> {
        let rest = self.rest();
        let name = re.captures(rest)?.get(1)?;
        let end = argument_end(rest, name.end(), required)?;
        self.pos += end;
        Some((name.as_str(), rest[name.end()..end].trim().to_string()))
    }

    fn flags(&mut self) -> ParseResult<()> {
        let patterns = &*PATTERNS;
        if let Some(captures) = self.matched(&patterns.hash) {
            self.set_attr("data-hash", group(&captures, 1));
        } else if let Some(captures) = self.matched(&patterns.index) {
            self.set_attr("data-index", group(&captures, 1));
        } else if let Some(captures) = self.matched(&patterns.error) {
            self.set_attr("data-error", located(&captures));
        } else if let Some(captures) = self.matched(&patterns.warning) {
            self.set_attr("data-warning", located(&captures));
        } else if self.matched(&patterns.lock).is_some() {
            self.set_attr("data-lock", "true");
        } else if self.matched(&patterns.off).is_some() {
            self.set_attr("data-off", "true");
        } else if self.matched(&patterns.included).is_some() {
            self.set_attr("data-included", "true");
        } else if self.matched(&patterns.extra).is_some() {
            self.set_attr("data-extra", "true");
        } else if self.literal(" : ") {
            self.across(State::Text);
        } else if self.matched(&patterns.spaces).is_none() {
            let under_embed =
                self.states.len() > 1 && self.states[self.states.len() - 2] == State::Embed;
            if under_embed {
                self.pop("flags")?;
            } else {
                self.across(State::Text);
            }
        }
        Ok(())
    }

    fn text(&mut self) -> ParseResult<()> {
        let patterns = &*PATTERNS;
        if self.para_needed {
            self.enter("p");
        }
        // Anything entered from here on is inline
        self.indent = None;

        if self.literal("{") {
            self.push(State::Element);
        } else if self.literal("}") {
            self.exit_pop("}")?;
        } else if let Some(space) = self.opens('_') {
            self.buffer.push_str(space);
            self.enter("em");
            self.push(State::Emphasis);
        } else if let Some(space) = self.opens('*') {
            self.buffer.push_str(space);
            self.enter("strong");
            self.push(State::Strong);
        } else if self.literal("\\`") {
            self.buffer.push('`');
        } else if self.literal("`") {
            self.enter("code");
            self.push(State::Code);
        } else if self.literal("\\|") {
            self.buffer.push('|');
        } else if self.literal("|") {
            self.script(None, "math/asciimath", State::AsciiMath);
        } else if self.literal("\\(") {
            self.script(None, "math/tex", State::Tex);
        } else if let Some(captures) = self.matched(&patterns.link) {
            self.flush();
            let a = self
                .doc
                .append_element_with(self.node, "a", &[("href", group(&captures, 2))]);
            self.doc.append_text(a, group(&captures, 1));
        } else if let Some(captures) = self.matched(&patterns.autolink) {
            self.flush();
            let url = group(&captures, 0);
            let a = self.doc.append_element_with(self.node, "a", &[("href", url)]);
            self.doc.append_text(a, url);
        } else if let Some(captures) = self.matched(&patterns.autoemail) {
            self.flush();
            let email = group(&captures, 0);
            let href = format!("mailto:{}", email);
            let a = self
                .doc
                .append_element_with(self.node, "a", &[("href", href.as_str())]);
            self.doc.append_text(a, email);
        } else if self.literal("\\@") {
            self.buffer.push('@');
        } else if let Some(captures) = self.matched(&patterns.refer) {
            self.flush();
            let target = format!("#{}", group(&captures, 1));
            self.doc
                .append_element_with(self.node, "span", &[("data-refer", target.as_str())]);
        } else if self.literal("\n") {
            self.across(State::StartOfLine);
        } else {
            self.add();
        }
        Ok(())
    }

    /// An opening emphasis or strong delimiter
    ///
    /// The delimiter follows whitespace (returned so that it is kept as
    /// text) or starts the text, and is followed by a non-whitespace
    /// character.
    fn opens(&mut self, delimiter: char) -> Option<&'src str> {
        let rest = self.rest();
        let mut chars = rest.chars();
        let first = chars.next()?;
        if first.is_whitespace() && chars.next() == Some(delimiter) {
            let space_len = first.len_utf8();
            if starts_solid(&rest[space_len + delimiter.len_utf8()..]) {
                self.pos += space_len + delimiter.len_utf8();
                return Some(&rest[..space_len]);
            }
            return None;
        }
        let preceded_by_space = self.input[..self.pos]
            .chars()
            .next_back()
            .is_none_or(char::is_whitespace);
        if first == delimiter
            && preceded_by_space
            && starts_solid(&rest[delimiter.len_utf8()..])
        {
            self.pos += delimiter.len_utf8();
            return Some("");
        }
        None
    }

    fn emphasis(&mut self) -> ParseResult<()> {
        if self.literal("_") {
            self.exit_pop("_")?;
        } else if let Some(space) = self.opens('*') {
            self.buffer.push_str(space);
            self.enter("strong");
            self.push(State::Strong);
        } else {
            self.add();
        }
        Ok(())
    }

    fn strong(&mut self) -> ParseResult<()> {
        if self.literal("*") {
            self.exit_pop("*")?;
        } else if let Some(space) = self.opens('_') {
            self.buffer.push_str(space);
            self.enter("em");
            self.push(State::Emphasis);
        } else {
            self.add();
        }
        Ok(())
    }

    fn code(&mut self) -> ParseResult<()> {
        if self.literal("\\`") {
            self.buffer.push('`');
        } else if self.literal("`") {
            self.exit_pop("`")?;
        } else {
            self.add();
        }
        Ok(())
    }

    fn ascii_math(&mut self) -> ParseResult<()> {
        if self.literal("\\|") {
            self.buffer.push('|');
        } else if self.literal("|") {
            self.exit_pop("|")?;
        } else {
            self.add();
        }
        Ok(())
    }

    fn tex(&mut self) -> ParseResult<()> {
        if self.literal("\\)") {
            self.exit_pop("\\)")?;
        } else {
            self.add();
        }
        Ok(())
    }

    /// Verbatim content of `exec` and `style` blocks, a line at a time
    fn embed(&mut self) {
        if self.literal(" ~ ") {
            self.push(State::Flags);
            return;
        }
        let rest = self.rest();
        let line = rest.find('\n').map_or(rest, |end| &rest[..=end]);
        let content = line.trim_end_matches('\n');
        let indent = content.len() - content.trim_start_matches([' ', '\t']).len();
        let (leading, content) = content.split_at(indent);
        let block = self.indent.unwrap_or(0);

        if !content.is_empty() && leading.len() <= block {
            // Leave the line for `sol`. Blank lines after the block make the
            // next content a new paragraph; until the first code line the
            // opener's own line end is in the bilge too.
            let opener = usize::from(self.buffer.is_empty());
            if self.bilge.len() > opener {
                self.para_needed = true;
            }
            self.bilge.clear();
            self.exit();
            self.across(State::StartOfLine);
            return;
        }
        if content.is_empty() {
            self.bilge.push('\n');
        } else {
            let bilge = std::mem::take(&mut self.bilge);
            self.buffer.push_str(&bilge);
            if leading.len() > block {
                self.buffer.push_str(&leading[block + 1..]);
            }
            self.buffer.push_str(content);
            self.buffer.push('\n');
        }
        self.pos += line.len();
    }
}

/// An error or warning message with its optional `@line,col` location
fn located(captures: &Captures) -> String {
    let message = group(captures, 1);
    match captures.get(3) {
        Some(location) => format!("{}@{}", message, location.as_str()),
        None => message.to_string(),
    }
}

/// Compile Cila into a document
///
/// Never fails: input the grammar cannot make sense of comes back as a
/// document holding the input as a single text node.
pub fn parse(source: &str) -> Document {
    match try_parse(source) {
        Ok(doc) => doc,
        Err(error) => {
            warn!(%error, "Cila parse failed, keeping input as text");
            let mut doc = Document::new();
            let root = doc.root();
            doc.append_text(root, source);
            doc
        }
    }
}

/// Compile Cila into a document, reporting grammar failures
pub fn try_parse(source: &str) -> ParseResult<Document> {
    let input = format!("{}\n", source);
    Parser::new(&input).parse()
}
