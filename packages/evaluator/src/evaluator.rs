//! # Stencil Renderer
//!
//! Renders a stencil [`Document`] in place by walking it depth first and
//! acting on the directive attributes it finds, using a [`Context`] to
//! evaluate expressions and code.
//!
//! ## Passes
//!
//! A render pass may be repeated on its own output. Directives record their
//! outcome in flag attributes (`data-off`, `data-index`, `data-hash`, ...),
//! so a second pass reconciles rather than duplicates: loop items are
//! matched up by index and executable blocks whose content hash has not
//! changed are not run again.
//!
//! ## Errors
//!
//! A directive that fails records a `data-error` flag on its node and
//! rendering carries on with the next sibling. Only invalid presentation
//! values (exec formats, sizes, units and contexts) abort the pass with a
//! [`RenderError`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stencil_evaluator::{Evaluator, MapContext};
//!
//! let mut doc = stencil_parser::parse("p\n\ttext name");
//! let mut context = MapContext::from_json(serde_json::json!({"name": "Ada"}))?;
//! Evaluator::new().render(&mut doc, &mut context)?;
//! ```

use crate::cleanup::scrub;
use crate::context::Context;
use crate::directives::{
    parse_macro, parse_size, parse_where, Attr, Execute, For, Include, Parameter, Set,
    EXEC_FORMATS, EXEC_UNITS,
};
use crate::error::{DirectiveError, DirectiveResult, RenderError, RenderResult};
use crate::hash::{ContentHasher, Effect};
use crate::resolver::Resolver;
use stencil_dom::{Document, NodeId, Selector};
use tracing::{debug, info, instrument, warn};

/// Directives that have a render step, in no particular order
const RENDERED: &[&str] = &[
    "data-exec",
    "data-where",
    "data-attr",
    "data-text",
    "data-with",
    "data-if",
    "data-elif",
    "data-else",
    "data-switch",
    "data-for",
    "data-par",
    "data-set",
    "data-include",
    "data-macro",
];

/// Include modifiers in the order they are applied
const MODIFIERS: &[&str] = &[
    "data-delete",
    "data-replace",
    "data-change",
    "data-before",
    "data-after",
    "data-prepend",
    "data-append",
];

const DEFAULT_SIZE: &str = "17";
const DEFAULT_UNITS: &str = "cm";

#[derive(Default)]
pub struct Evaluator<'r> {
    hasher: ContentHasher,
    resolver: Option<&'r dyn Resolver>,
}

impl<'r> Evaluator<'r> {
    pub fn new() -> Self {
        Self::default()
    }

    /// An evaluator that fetches included documents from `resolver`
    pub fn with_resolver(resolver: &'r dyn Resolver) -> Self {
        Self {
            hasher: ContentHasher::new(),
            resolver: Some(resolver),
        }
    }

    pub fn hasher(&self) -> &ContentHasher {
        &self.hasher
    }

    /// Render a whole document
    #[instrument(skip_all, fields(nodes = doc.len()))]
    pub fn render(&mut self, doc: &mut Document, context: &mut dyn Context) -> RenderResult<()> {
        info!("Starting render pass");
        self.hasher.reset();
        let root = doc.root();
        self.render_node(doc, root, context)?;
        info!(hash = self.hasher.running(), "Finished render pass");
        Ok(())
    }

    /// Render a node, dispatching on its first directive
    pub fn render_node(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        context: &mut dyn Context,
    ) -> RenderResult<()> {
        if doc.is_text(node) {
            return Ok(());
        }
        if doc.is_document(node) {
            return self.render_children(doc, node, context);
        }

        let directive = doc
            .attr_names(node)
            .into_iter()
            .find(|attr| RENDERED.contains(&attr.as_str()));
        let Some(directive) = directive else {
            return self.render_children(doc, node, context);
        };

        // Branches are rendered, and their errors kept, by the `if` that heads them
        if directive == "data-elif" || directive == "data-else" {
            return Ok(());
        }
        if directive != "data-exec" {
            doc.remove_attr(node, "data-error");
        }
        debug!(directive = %directive, tag = doc.name(node), "Rendering directive");

        let result = match directive.as_str() {
            "data-exec" => self.render_exec(doc, node, context),
            "data-where" => self.render_where(doc, node, context),
            "data-attr" => self.render_attr(doc, node, context),
            "data-text" => self.render_text(doc, node, context),
            "data-with" => self.render_with(doc, node, context),
            "data-if" => self.render_if(doc, node, context),
            "data-switch" => self.render_switch(doc, node, context),
            "data-for" => self.render_for(doc, node, context),
            "data-par" => self.render_par(doc, node, context),
            "data-set" => self.render_set(doc, node, context),
            "data-include" => self.render_include(doc, node, context),
            "data-macro" => self.render_macro(doc, node),
            _ => Ok(()),
        };

        match result {
            Ok(()) => Ok(()),
            Err(DirectiveError::InvalidValue { kind, value }) => {
                Err(RenderError::InvalidValue { kind, value })
            }
            Err(error) => {
                self.flag(doc, node, &directive, &error);
                Ok(())
            }
        }
    }

    /// Render the children of a node that are still attached to it
    pub fn render_children(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        context: &mut dyn Context,
    ) -> RenderResult<()> {
        for child in doc.children(node).to_vec() {
            if doc.parent(child) == Some(node) {
                self.render_node(doc, child, context)?;
            }
        }
        Ok(())
    }

    fn flag(&self, doc: &mut Document, node: NodeId, directive: &str, error: &DirectiveError) {
        warn!(directive, %error, "Directive failed");
        doc.set_attr(node, "data-error", error.flag());
    }

    /// Turn a conditional branch on (rendering it) or off
    fn branch(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        on: bool,
        context: &mut dyn Context,
    ) -> DirectiveResult<()> {
        if on {
            doc.remove_attr(node, "data-off");
            self.render_children(doc, node, context)?;
        } else {
            doc.set_attr(node, "data-off", "true");
        }
        Ok(())
    }

    fn render_exec(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        context: &mut dyn Context,
    ) -> DirectiveResult<()> {
        let exec = Execute::parse(doc.attr(node, "data-exec").unwrap_or_default())?;

        let accepted = exec.contexts == ["exec"]
            || exec.contexts.iter().any(|name| context.accept(name));
        if !accepted {
            debug!(contexts = ?exec.contexts, "No accepting context, skipping");
            return Ok(());
        }

        let effect = if exec.constant {
            Effect::Constant
        } else if exec.volatile {
            Effect::Volatile
        } else {
            Effect::Cumulative
        };
        let hash = self.hasher.hash(doc, node, effect, true, true, "");
        if doc.attr(node, "data-hash") == Some(hash.as_str()) {
            debug!(hash = %hash, "Unchanged since last render");
            return Ok(());
        }
        doc.set_attr(node, "data-hash", hash.clone());
        doc.remove_attr(node, "data-error");
        doc.remove_attr(node, "data-warning");

        let code = doc.text(node);
        if code.trim().is_empty() {
            return Ok(());
        }

        let format = exec.format.resolve(context)?;
        if !EXEC_FORMATS.contains(&format.as_str()) {
            return Err(DirectiveError::invalid("format", &format));
        }
        let mut width = exec.width.resolve(context)?;
        let mut height = exec.height.resolve(context)?;
        let mut units = exec.units.resolve(context)?;
        let size = exec.size.resolve(context)?;
        if !size.is_empty() {
            let (size_width, size_height, size_units) = parse_size(&size)?;
            width = size_width;
            height = size_height;
            if let Some(size_units) = size_units {
                units = size_units;
            }
        }
        if width.is_empty() {
            width = DEFAULT_SIZE.to_string();
        }
        if height.is_empty() {
            height = DEFAULT_SIZE.to_string();
        }
        if units.is_empty() {
            units = DEFAULT_UNITS.to_string();
        }
        if !EXEC_UNITS.contains(&units.as_str()) {
            return Err(DirectiveError::invalid("units", &units));
        }

        let id = output_id(doc, node, &hash);

        if let Some(next) = doc.next_element(node) {
            if doc.attr(next, "data-out") == Some("true") {
                doc.destroy(next);
            }
        }

        let result = context.execute(&code, &id, &format, &width, &height, &units)?;

        if !format.is_empty() {
            let out = doc.create_element("div");
            doc.set_attr(out, "data-out", "true");
            if format == "text" {
                let pre = doc.append_element(out, "pre");
                doc.append_text(pre, result);
            } else {
                let style = format!(
                    "max-width:{}{};max-height:{}{}",
                    width, units, height, units
                );
                doc.append_element_with(out, "img", &[("src", result.as_str()), ("style", style.as_str())]);
            }
            doc.insert_after(node, out);
        }
        Ok(())
    }

    fn render_where(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        context: &mut dyn Context,
    ) -> DirectiveResult<()> {
        let contexts = parse_where(doc.attr(node, "data-where").unwrap_or_default())?;
        let accepted = contexts.iter().any(|name| context.accept(name));
        self.branch(doc, node, accepted, context)
    }

    fn render_attr(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        context: &mut dyn Context,
    ) -> DirectiveResult<()> {
        let attr = Attr::parse(doc.attr(node, "data-attr").unwrap_or_default())?;
        let given = match &attr.given {
            Some(given) => context.test(given)?,
            None => true,
        };
        if given {
            let value = match &attr.value {
                Some(value) => context.write(value)?,
                None => "true".to_string(),
            };
            doc.set_attr(node, attr.name, value);
        }
        self.render_children(doc, node, context)?;
        Ok(())
    }

    fn render_text(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        context: &mut dyn Context,
    ) -> DirectiveResult<()> {
        let expression = doc.attr(node, "data-text").unwrap_or_default().trim().to_string();
        if expression.is_empty() {
            return Err(DirectiveError::empty("text"));
        }
        if !doc.has_attr(node, "data-lock") {
            let text = context.write(&expression)?;
            doc.set_text(node, text);
        }
        Ok(())
    }

    fn render_with(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        context: &mut dyn Context,
    ) -> DirectiveResult<()> {
        let expression = doc.attr(node, "data-with").unwrap_or_default().trim().to_string();
        if expression.is_empty() {
            return Err(DirectiveError::empty("with"));
        }
        context.enter(&expression)?;
        let result = self.render_children(doc, node, context);
        context.exit();
        result?;
        Ok(())
    }

    fn render_if(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        context: &mut dyn Context,
    ) -> DirectiveResult<()> {
        let expression = doc.attr(node, "data-if").unwrap_or_default().to_string();
        let mut hit = context.test(&expression)?;
        self.branch(doc, node, hit, context)?;

        let mut next = doc.next_element(node);
        while let Some(sibling) = next {
            next = doc.next_element(sibling);
            if let Some(expression) = doc.attr(sibling, "data-elif").map(str::to_string) {
                doc.remove_attr(sibling, "data-error");
                if hit {
                    self.branch(doc, sibling, false, context)?;
                    continue;
                }
                match context.test(&expression) {
                    Ok(on) => {
                        hit = on;
                        self.branch(doc, sibling, on, context)?;
                    }
                    Err(error) => {
                        self.branch(doc, sibling, false, context)?;
                        self.flag(doc, sibling, "data-elif", &error.into());
                    }
                }
            } else if doc.has_attr(sibling, "data-else") {
                self.branch(doc, sibling, !hit, context)?;
                break;
            } else {
                break;
            }
        }
        Ok(())
    }

    fn render_switch(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        context: &mut dyn Context,
    ) -> DirectiveResult<()> {
        let expression = doc.attr(node, "data-switch").unwrap_or_default().to_string();
        context.mark(&expression)?;
        let result = self.render_cases(doc, node, context);
        context.unmark();
        result
    }

    fn render_cases(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        context: &mut dyn Context,
    ) -> DirectiveResult<()> {
        let mut matched = false;
        let mut defaults = Vec::new();
        for child in doc.children(node).to_vec() {
            if let Some(case) = doc.attr(child, "data-case").map(str::to_string) {
                let on = !matched && context.matches(&case)?;
                matched |= on;
                self.branch(doc, child, on, context)?;
            } else if doc.has_attr(child, "data-default") {
                defaults.push(child);
            } else {
                self.render_node(doc, child, context)?;
            }
        }
        for default in defaults {
            self.branch(doc, default, !matched, context)?;
        }
        Ok(())
    }

    fn render_for(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        context: &mut dyn Context,
    ) -> DirectiveResult<()> {
        let each = For::parse(doc.attr(node, "data-for").unwrap_or_default())?;
        let Some(template) = doc.first_element(node) else {
            return Ok(());
        };

        let mut more = context.begin(&each.item, &each.items)?;
        doc.remove_attr(template, "data-each");

        let mut count = 0;
        let result: DirectiveResult<()> = loop {
            if !more {
                break Ok(());
            }
            let index = count.to_string();
            let existing = doc
                .element_children(node)
                .into_iter()
                .find(|&child| doc.attr(child, "data-index") == Some(index.as_str()));
            let item = match existing {
                Some(existing) if is_locked(doc, existing) => existing,
                Some(existing) => {
                    let fresh = doc.duplicate(template);
                    doc.insert_before(existing, fresh);
                    doc.destroy(existing);
                    fresh
                }
                None => {
                    let fresh = doc.duplicate(template);
                    doc.append_child(node, fresh);
                    fresh
                }
            };
            if let Err(error) = self.render_node(doc, item, context) {
                break Err(error.into());
            }
            scrub(doc, item);
            doc.set_attr(item, "data-index", index);

            count += 1;
            more = match context.next() {
                Ok(more) => more,
                Err(error) => break Err(error.into()),
            };
        };
        doc.set_attr(template, "data-each", "true");
        result?;

        for child in doc.element_children(node) {
            let extra = doc
                .attr(child, "data-index")
                .and_then(|index| index.parse::<usize>().ok())
                .is_some_and(|index| index >= count);
            if extra {
                if is_locked(doc, child) {
                    doc.set_attr(child, "data-extra", "true");
                    doc.move_to_end(child, node);
                } else {
                    doc.destroy(child);
                }
            }
        }
        Ok(())
    }

    fn render_par(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        context: &mut dyn Context,
    ) -> DirectiveResult<()> {
        let par = Parameter::parse(doc.attr(node, "data-par").unwrap_or_default())?;
        let input_id = format!("{}-input", par.name);

        if doc.select_tag(node, "label").is_none() {
            let label = doc.append_element_with(node, "label", &[("for", input_id.as_str())]);
            doc.append_text(label, par.name.clone());
        }
        let input = match doc.select_tag(node, "input") {
            Some(input) => input,
            None => doc.append_element(node, "input"),
        };
        doc.set_attr(input, "name", par.name.clone());
        doc.set_attr(input, "id", input_id);
        match par.kind() {
            "" => {}
            "boolean" => doc.set_attr(input, "type", "checkbox"),
            kind => doc.set_attr(input, "type", kind),
        }

        let mut value = doc.attr(input, "value").unwrap_or_default().to_string();
        if value.is_empty() {
            if let Some(default) = &par.default {
                value = default.clone();
                doc.set_attr(input, "value", value.clone());
            }
        }

        let hash = self
            .hasher
            .hash(doc, node, Effect::Cumulative, true, true, &value);
        if doc.attr(node, "data-hash") != Some(hash.as_str()) {
            doc.set_attr(node, "data-hash", hash);
            context.input(&par.name, par.kind(), &value)?;
        }
        Ok(())
    }

    fn render_set(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        context: &mut dyn Context,
    ) -> DirectiveResult<()> {
        let set = Set::parse(doc.attr(node, "data-set").unwrap_or_default())?;
        context.assign(&set.name, &set.expression)?;
        Ok(())
    }

    fn render_include(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        context: &mut dyn Context,
    ) -> DirectiveResult<()> {
        let include = Include::parse(doc.attr(node, "data-include").unwrap_or_default())?;

        let holder = doc
            .element_children(node)
            .into_iter()
            .find(|&child| doc.has_attr(child, "data-included"));
        let holder = match holder {
            Some(holder) => holder,
            None => doc.append_element_with(node, "div", &[("data-included", "true")]),
        };

        let locked = doc
            .descendants(holder)
            .into_iter()
            .any(|id| doc.attr(id, "data-lock") == Some("true"));
        if !locked {
            doc.clear(holder);
            self.fill(doc, node, holder, &include, context)?;
            for modifier in MODIFIERS {
                for modifier_node in outside(doc, node, holder, modifier) {
                    modify(doc, holder, modifier_node, modifier)?;
                }
            }
        }

        if !include.names {
            context.enter("")?;
        }
        let result = self.render_included(doc, node, holder, &include, context);
        if !include.names {
            context.exit();
        }
        result
    }

    /// Copy the included content into the holder
    fn fill(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        holder: NodeId,
        include: &Include,
        context: &mut dyn Context,
    ) -> DirectiveResult<()> {
        let address = include.address.resolve(context)?;
        let select = include.select.resolve(context)?;
        let selector = if select.is_empty() {
            None
        } else {
            Some(Selector::parse(&select).map_err(|_| DirectiveError::syntax("select", &select))?)
        };

        let copies: Vec<NodeId> = if address == "." {
            let root = doc.root();
            let sources = match &selector {
                Some(selector) => doc.filter(root, selector),
                None => doc.children(root).to_vec(),
            };
            // Never copy the include into itself
            let sources: Vec<NodeId> = sources
                .into_iter()
                .filter(|&source| {
                    source != node && !doc.is_ancestor(source, node) && !doc.is_ancestor(node, source)
                })
                .collect();
            sources
                .into_iter()
                .map(|source| doc.duplicate(source))
                .collect()
        } else {
            let unresolved = || DirectiveError::Unresolved {
                address: address.clone(),
            };
            let other = self
                .resolver
                .and_then(|resolver| resolver.resolve(&address))
                .ok_or_else(unresolved)?;
            let root = other.root();
            let sources = match &selector {
                Some(selector) => other.filter(root, selector),
                None => other.children(root).to_vec(),
            };
            sources
                .into_iter()
                .map(|source| doc.import(&other, source))
                .collect()
        };

        debug!(address = %address, count = copies.len(), "Including");
        for copy in copies {
            if selector.is_some() {
                doc.remove_attr(copy, "data-macro");
                doc.remove_attr(copy, "id");
            }
            doc.append_child(holder, copy);
        }
        Ok(())
    }

    fn render_included(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        holder: NodeId,
        include: &Include,
        context: &mut dyn Context,
    ) -> DirectiveResult<()> {
        let mut assigned = Vec::new();
        for set_node in outside(doc, node, holder, "data-set") {
            let set = Set::parse(doc.attr(set_node, "data-set").unwrap_or_default())?;
            context.assign(&set.name, &set.expression)?;
            assigned.push(set.name);
        }

        let mut satisfied = true;
        for par_node in doc.filter_attr(holder, "data-par") {
            let par = Parameter::parse(doc.attr(par_node, "data-par").unwrap_or_default())?;
            if !assigned.contains(&par.name) {
                match &par.default {
                    Some(default) => context.input(&par.name, par.kind(), default)?,
                    None => {
                        let error = DirectiveError::RequiredParameter {
                            name: par.name.clone(),
                        };
                        self.flag(doc, node, "data-include", &error);
                        satisfied = false;
                    }
                }
            }
            doc.destroy(par_node);
        }

        if satisfied {
            self.render_children(doc, holder, context)?;
        }
        if !include.complete {
            scrub(doc, holder);
        }
        Ok(())
    }

    fn render_macro(&mut self, doc: &mut Document, node: NodeId) -> DirectiveResult<()> {
        let name = parse_macro(doc.attr(node, "data-macro").unwrap_or_default())?;
        doc.set_attr(node, "id", name);
        Ok(())
    }
}

/// Render a document with a fresh evaluator
pub fn render(doc: &mut Document, context: &mut dyn Context) -> RenderResult<()> {
    Evaluator::new().render(doc, context)
}

/// Is the node, or anything in it, locked against re-rendering
fn is_locked(doc: &Document, node: NodeId) -> bool {
    doc.has_attr(node, "data-lock")
        || doc
            .descendants(node)
            .into_iter()
            .any(|id| doc.has_attr(id, "data-lock"))
}

/// Nodes within `node` carrying `attr`, excluding the include holder
fn outside(doc: &Document, node: NodeId, holder: NodeId, attr: &str) -> Vec<NodeId> {
    doc.filter_attr(node, attr)
        .into_iter()
        .filter(|&id| id != holder && !doc.is_ancestor(holder, id))
        .collect()
}

/// Apply one include modifier to the matching nodes in the holder
fn modify(
    doc: &mut Document,
    holder: NodeId,
    modifier: NodeId,
    attr: &str,
) -> DirectiveResult<()> {
    let select = doc.attr(modifier, attr).unwrap_or_default().to_string();
    let name = attr.trim_start_matches("data-");
    let selector =
        Selector::parse(&select).map_err(|_| DirectiveError::syntax(name, &select))?;
    let content = doc.children(modifier).to_vec();

    for target in doc.filter(holder, &selector) {
        let copies: Vec<NodeId> = content.iter().map(|&child| doc.duplicate(child)).collect();
        match name {
            "delete" => doc.destroy(target),
            "replace" => {
                for copy in copies {
                    doc.insert_before(target, copy);
                }
                doc.destroy(target);
            }
            "change" => {
                doc.clear(target);
                for copy in copies {
                    doc.append_child(target, copy);
                }
            }
            "before" => {
                for copy in copies {
                    doc.insert_before(target, copy);
                }
            }
            "after" => {
                for copy in copies.into_iter().rev() {
                    doc.insert_after(target, copy);
                }
            }
            "prepend" => {
                for copy in copies.into_iter().rev() {
                    doc.prepend_child(target, copy);
                }
            }
            _ => {
                for copy in copies {
                    doc.append_child(target, copy);
                }
            }
        }
    }
    Ok(())
}

/// Id for the output of an executable block
///
/// Built from the parent's id, a slug of the nearest caption and the hash,
/// so that figures get readable, stable file names.
fn output_id(doc: &Document, node: NodeId, hash: &str) -> String {
    let mut parts = Vec::new();
    if let Some(parent) = doc.parent(node) {
        if let Some(id) = doc.attr(parent, "id").filter(|id| !id.is_empty()) {
            parts.push(id.to_string());
        }
        let caption = doc
            .descendants(parent)
            .into_iter()
            .find(|&id| matches!(doc.name(id), "caption" | "figcaption"));
        if let Some(caption) = caption {
            let slug = slugify(&doc.text(caption), 25);
            if !slug.is_empty() {
                parts.push(slug);
            }
        }
    }
    parts.push(hash.to_string());
    parts.join("-")
}

pub(crate) fn slugify(text: &str, length: usize) -> String {
    let mut slug = String::new();
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug: String = slug.chars().take(length).collect();
    slug.trim_end_matches('-').to_string()
}
