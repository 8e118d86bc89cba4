/// Tests for the clean, scrub and strip passes
use crate::cleanup::{clean, scrub, strip};
use crate::tests_support::*;
use stencil_dom::Document;

fn rendered() -> Document {
    document(vec![el("div")
        .with_attr("data-if", "x")
        .with_child(el("pre").with_attr("data-exec", "r").with_text("1 + 1"))
        .with_child(el("p").with_attr("data-off", "true").with_text("hidden"))
        .with_child(
            el("p")
                .with_attr("data-text", "y")
                .with_attr("data-error", "context: oops"),
        )
        .with_child(
            el("pre")
                .with_attr("data-exec", "py")
                .with_attr("data-error", "context: failed")
                .with_text("boom()"),
        )
        .with_child(
            el("span")
                .with_attr("data-text", "z")
                .with_attr("data-hash", "abc")
                .with_text("hi"),
        )])
}

#[test]
fn test_scrub() {
    let mut doc = rendered();
    let div = top(&doc, 0);
    scrub(&mut doc, div);

    assert_eq!(
        snapshot(&doc),
        stencil_dom::Snapshot::Document(vec![el("div")
            .with_child(
                el("p")
                    .with_attr("data-text", "y")
                    .with_attr("data-error", "context: oops")
            )
            .with_child(
                el("pre")
                    .with_attr("data-exec", "py")
                    .with_attr("data-error", "context: failed")
                    .with_text("boom()")
            )
            .with_child(el("span").with_attr("data-hash", "abc").with_text("hi"))])
    );
}

#[test]
fn test_scrub_is_idempotent() {
    let mut doc = rendered();
    let root = doc.root();
    scrub(&mut doc, root);
    let once = snapshot(&doc);
    scrub(&mut doc, root);
    assert_eq!(snapshot(&doc), once);
}

#[test]
fn test_scrub_never_destroys_its_root() {
    let mut doc = document(vec![el("p").with_attr("data-off", "true").with_text("x")]);
    let p = top(&doc, 0);
    scrub(&mut doc, p);
    assert_eq!(doc.children(doc.root()), &[p]);
    assert_eq!(doc.attr(p, "data-off"), Some("true"));
}

#[test]
fn test_strip_removes_flags_but_keeps_content() {
    let mut doc = rendered();
    let root = doc.root();
    strip(&mut doc, root);

    let div = top(&doc, 0);
    let children = doc.element_children(div);
    assert_eq!(children.len(), 3);
    // Still a directive because it failed
    assert_eq!(doc.attr(children[0], "data-text"), Some("y"));
    assert!(!doc.has_attr(children[0], "data-error"));
    assert_eq!(doc.attr_count(children[2]), 0);
    assert_eq!(doc.text(children[2]), "hi");
}

#[test]
fn test_clean() {
    let mut doc = document(vec![
        el("ul")
            .with_attr("data-for", "item in items")
            .with_child(
                el("li")
                    .with_attr("data-each", "true")
                    .with_child(el("span").with_attr("data-text", "item")),
            )
            .with_child(el("li").with_attr("data-index", "0").with_text("a"))
            .with_child(el("li").with_attr("data-index", "1").with_text("b")),
        el("pre")
            .with_attr("data-exec", "r format text")
            .with_attr("data-hash", "xyz")
            .with_attr("data-error", "context: bad")
            .with_text("x"),
        el("div")
            .with_attr("data-out", "true")
            .with_child(el("pre").with_text("42")),
        el("span").with_attr("data-text", "answer").with_text("42"),
        el("div")
            .with_attr("data-if", "x")
            .with_attr("data-off", "true")
            .with_text("kept"),
        el("div").with_attr("id", "outline").with_child(el("ul")),
    ]);
    let root = doc.root();
    clean(&mut doc, root);

    assert_eq!(
        snapshot(&doc),
        stencil_dom::Snapshot::Document(vec![
            el("ul").with_attr("data-for", "item in items").with_child(
                el("li")
                    .with_attr("data-each", "true")
                    .with_child(el("span").with_attr("data-text", "item"))
            ),
            el("pre")
                .with_attr("data-exec", "r format text")
                .with_text("x"),
            el("span").with_attr("data-text", "answer"),
            el("div").with_attr("data-if", "x").with_text("kept"),
            el("div").with_attr("id", "outline"),
        ])
    );
}
