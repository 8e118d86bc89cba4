/// Tests for including content from other documents
use crate::evaluator::Evaluator;
use crate::map_context::MapContext;
use crate::resolver::MemoryResolver;
use crate::tests_support::*;
use stencil_dom::{Document, NodeId, Snapshot};

fn render(doc: &mut Document, resolver: &MemoryResolver, context: &mut MapContext) {
    Evaluator::with_resolver(resolver)
        .render(doc, context)
        .unwrap();
}

fn holder(doc: &Document, include: NodeId) -> NodeId {
    doc.element_children(include)
        .into_iter()
        .find(|&child| doc.has_attr(child, "data-included"))
        .unwrap()
}

fn card_library() -> Document {
    document(vec![
        el("div")
            .with_attr("id", "card")
            .with_attr("data-macro", "card")
            .with_child(el("p").with_child(el("span").with_attr("data-text", "title"))),
        el("p").with_text("Not included"),
    ])
}

#[test]
fn test_include_whole_document() {
    let mut resolver = MemoryResolver::new();
    resolver.insert_cila("lib", "p Hello");
    let mut doc = document(vec![el("div").with_attr("data-include", "lib")]);
    render(&mut doc, &resolver, &mut MapContext::new());

    assert_eq!(
        doc.snapshot(top(&doc, 0)),
        el("div").with_attr("data-include", "lib").with_child(
            el("div")
                .with_attr("data-included", "true")
                .with_child(el("p").with_text("Hello"))
        )
    );
}

#[test]
fn test_include_selected_macro_with_set() {
    let mut resolver = MemoryResolver::new();
    resolver.insert("lib", card_library());
    let mut doc = document(vec![el("div")
        .with_attr("data-include", "lib select #card")
        .with_child(el("div").with_attr("data-set", "title to 'Hi'"))]);
    let mut context = MapContext::new();
    render(&mut doc, &resolver, &mut context);

    let include = top(&doc, 0);
    assert_eq!(
        doc.snapshot(holder(&doc, include)),
        el("div").with_attr("data-included", "true").with_child(
            el("div").with_child(el("p").with_child(el("span").with_text("Hi")))
        )
    );
    // Assignments are scoped to the include
    assert!(context.get("title").is_none());
}

#[test]
fn test_names_leaves_assignments_in_scope() {
    let mut resolver = MemoryResolver::new();
    resolver.insert("lib", card_library());
    let mut doc = document(vec![el("div")
        .with_attr("data-include", "lib select #card names")
        .with_child(el("div").with_attr("data-set", "title to 'Hi'"))]);
    let mut context = MapContext::new();
    render(&mut doc, &resolver, &mut context);
    assert_eq!(context.get("title"), Some(&serde_json::json!("Hi")));
}

#[test]
fn test_complete_keeps_directives() {
    let mut resolver = MemoryResolver::new();
    resolver.insert("lib", card_library());
    let mut doc = document(vec![el("div")
        .with_attr("data-include", "lib select #card complete")
        .with_child(el("div").with_attr("data-set", "title to 'Hi'"))]);
    render(&mut doc, &resolver, &mut MapContext::new());

    let included = holder(&doc, top(&doc, 0));
    let span = doc.select_tag(included, "span").unwrap();
    assert_eq!(doc.attr(span, "data-text"), Some("title"));
    assert_eq!(doc.text(span), "Hi");
}

fn parameterised() -> Document {
    document(vec![
        el("div").with_attr("data-par", "n"),
        el("p").with_child(el("span").with_attr("data-text", "n")),
    ])
}

#[test]
fn test_missing_required_parameter() {
    let mut resolver = MemoryResolver::new();
    resolver.insert("lib", parameterised());
    let mut doc = document(vec![el("div").with_attr("data-include", "lib")]);
    render(&mut doc, &resolver, &mut MapContext::new());

    let include = top(&doc, 0);
    assert_eq!(doc.attr(include, "data-error"), Some("required: n"));
    let included = holder(&doc, include);
    assert!(doc.filter_attr(included, "data-par").is_empty());
    assert_eq!(doc.text(included), "");
}

#[test]
fn test_parameter_defaults_and_sets() {
    let mut resolver = MemoryResolver::new();
    resolver.insert(
        "lib",
        document(vec![
            el("div").with_attr("data-par", "n default 5"),
            el("p").with_child(el("span").with_attr("data-text", "n")),
        ]),
    );
    resolver.insert("required", parameterised());

    let mut doc = document(vec![
        el("div").with_attr("data-include", "lib"),
        el("div")
            .with_attr("data-include", "lib")
            .with_child(el("div").with_attr("data-set", "n to 7")),
        el("div")
            .with_attr("data-include", "required")
            .with_child(el("div").with_attr("data-set", "n to 1")),
    ]);
    render(&mut doc, &resolver, &mut MapContext::new());

    let texts: Vec<String> = (0..3)
        .map(|index| doc.text(holder(&doc, top(&doc, index))))
        .collect();
    assert_eq!(texts, vec!["5", "7", "1"]);
    assert!(!doc.has_attr(top(&doc, 2), "data-error"));
}

#[test]
fn test_modifiers_apply_in_order() {
    let mut resolver = MemoryResolver::new();
    resolver.insert(
        "lib",
        document(vec![el("ul")
            .with_child(el("li").with_attr("class", "a").with_text("A"))
            .with_child(el("li").with_attr("class", "b").with_text("B"))]),
    );
    let mut doc = document(vec![el("div")
        .with_attr("data-include", "lib")
        .with_child(
            el("div")
                .with_attr("data-append", "ul")
                .with_child(el("li").with_text("C")),
        )
        .with_child(
            el("div")
                .with_attr("data-replace", ".b")
                .with_child(el("li").with_text("B2")),
        )
        .with_child(el("div").with_attr("data-delete", ".a"))
        .with_child(
            el("div")
                .with_attr("data-prepend", "ul")
                .with_child(el("li").with_text("0")),
        )]);
    render(&mut doc, &resolver, &mut MapContext::new());

    let included = holder(&doc, top(&doc, 0));
    let ul = doc.first_element(included).unwrap();
    assert_eq!(
        doc.snapshot(ul),
        el("ul")
            .with_child(el("li").with_text("0"))
            .with_child(el("li").with_text("B2"))
            .with_child(el("li").with_text("C"))
    );
}

#[test]
fn test_change_before_and_after() {
    let mut resolver = MemoryResolver::new();
    resolver.insert("lib", document(vec![el("p").with_attr("id", "x").with_text("old")]));
    let mut doc = document(vec![el("div")
        .with_attr("data-include", "lib")
        .with_child(el("div").with_attr("data-change", "#x").with_text("new"))
        .with_child(el("div").with_attr("data-before", "#x").with_child(el("hr")))
        .with_child(
            el("div")
                .with_attr("data-after", "#x")
                .with_child(el("b"))
                .with_child(el("i")),
        )]);
    render(&mut doc, &resolver, &mut MapContext::new());

    let included = holder(&doc, top(&doc, 0));
    assert_eq!(
        doc.snapshot(included),
        el("div")
            .with_attr("data-included", "true")
            .with_child(el("hr"))
            .with_child(el("p").with_attr("id", "x").with_text("new"))
            .with_child(el("b"))
            .with_child(el("i"))
    );
}

#[test]
fn test_unresolved_address() {
    let resolver = MemoryResolver::new();
    let mut doc = document(vec![el("div").with_attr("data-include", "missing")]);
    render(&mut doc, &resolver, &mut MapContext::new());
    assert_eq!(
        doc.attr(top(&doc, 0), "data-error"),
        Some("unresolved: missing")
    );
}

#[test]
fn test_include_from_the_same_document() {
    let resolver = MemoryResolver::new();
    let mut doc = document(vec![
        el("div")
            .with_attr("id", "a")
            .with_child(el("p").with_text("A")),
        el("section").with_child(el("div").with_attr("data-include", ". select #a")),
    ]);
    render(&mut doc, &resolver, &mut MapContext::new());

    let include = doc.first_element(top(&doc, 1)).unwrap();
    assert_eq!(
        doc.snapshot(holder(&doc, include)),
        el("div")
            .with_attr("data-included", "true")
            .with_child(el("div").with_child(el("p").with_text("A")))
    );
}

#[test]
fn test_locked_holder_is_not_refreshed() {
    let mut resolver = MemoryResolver::new();
    resolver.insert_cila("lib", "p New");
    let mut doc = document(vec![el("div").with_attr("data-include", "lib").with_child(
        el("div").with_attr("data-included", "true").with_child(
            el("p")
                .with_attr("data-lock", "true")
                .with_text("Edited"),
        ),
    )]);
    render(&mut doc, &resolver, &mut MapContext::new());
    assert_eq!(doc.text(top(&doc, 0)), "Edited");
}

#[test]
fn test_rerender_does_not_duplicate() {
    let mut resolver = MemoryResolver::new();
    resolver.insert_cila("lib", "p Hello");
    let mut doc = document(vec![el("div").with_attr("data-include", "lib")]);
    let mut context = MapContext::new();
    render(&mut doc, &resolver, &mut context);
    let first: Snapshot = snapshot(&doc);
    render(&mut doc, &resolver, &mut context);
    assert_eq!(snapshot(&doc), first);
}
