/// Tests for compiling Cila into documents
use crate::*;
use stencil_dom::{Document, Snapshot};

fn parsed(source: &str) -> Snapshot {
    let doc = parse(source);
    doc.snapshot(doc.root())
}

fn document(children: Vec<Snapshot>) -> Snapshot {
    Snapshot::Document(children)
}

fn el(tag: &str) -> Snapshot {
    Snapshot::element(tag)
}

#[test]
fn test_paragraph_element() {
    assert_eq!(
        parsed("p Hello"),
        document(vec![el("p").with_text("Hello")])
    );
}

#[test]
fn test_plain_text_is_a_paragraph() {
    assert_eq!(
        parsed("Hello world"),
        document(vec![el("p").with_text("Hello world")])
    );
}

#[test]
fn test_list_items() {
    assert_eq!(
        parsed("ul\n\t- one\n\t- two"),
        document(vec![el("ul")
            .with_child(el("li").with_text("one"))
            .with_child(el("li").with_text("two"))])
    );
}

#[test]
fn test_list_shorthand_creates_list() {
    assert_eq!(
        parsed("- one\n- two"),
        document(vec![el("ul")
            .with_child(el("li").with_text("one"))
            .with_child(el("li").with_text("two"))])
    );
    assert_eq!(
        parsed("1. one\n2. two"),
        document(vec![el("ol")
            .with_child(el("li").with_text("one"))
            .with_child(el("li").with_text("two"))])
    );
}

#[test]
fn test_indentation_nests_and_dedent_closes() {
    assert_eq!(
        parsed("div\n\tdiv\n\t\tp a\ndiv"),
        document(vec![
            el("div").with_child(el("div").with_child(el("p").with_text("a"))),
            el("div"),
        ])
    );
}

#[test]
fn test_blank_line_starts_paragraph() {
    assert_eq!(
        parsed("div\n\n\tFirst\n\n\tSecond"),
        document(vec![el("div")
            .with_child(el("p").with_text("First"))
            .with_child(el("p").with_text("Second"))])
    );
}

#[test]
fn test_section_shorthand() {
    assert_eq!(
        parsed("> Getting started\n\n\tSome text"),
        document(vec![el("section")
            .with_attr("id", "getting-started")
            .with_child(el("h1").with_text("Getting started"))
            .with_child(el("p").with_text("Some text"))])
    );
}

#[test]
fn test_plain_attributes() {
    assert_eq!(
        parsed("div #main .a .b [title=Hello world]"),
        document(vec![el("div")
            .with_attr("id", "main")
            .with_attr("class", "a b")
            .with_attr("title", "Hello world")])
    );
    // Without a tag the first attribute creates a div
    assert_eq!(
        parsed("#main"),
        document(vec![el("div").with_attr("id", "main")])
    );
}

#[test]
fn test_directives() {
    assert_eq!(
        parsed("if x > 1\n\tp Yes\nelse\n\tp No"),
        document(vec![
            el("div")
                .with_attr("data-if", "x > 1")
                .with_child(el("p").with_text("Yes")),
            el("div")
                .with_attr("data-else", "true")
                .with_child(el("p").with_text("No")),
        ])
    );
}

#[test]
fn test_text_directive_is_a_span() {
    assert_eq!(
        parsed("text answer"),
        document(vec![el("span").with_attr("data-text", "answer")])
    );
}

#[test]
fn test_for_each() {
    assert_eq!(
        parsed("ul for item in items\n\tli each\n\t\ttext item"),
        document(vec![el("ul")
            .with_attr("data-for", "item in items")
            .with_child(
                el("li")
                    .with_attr("data-each", "true")
                    .with_child(el("span").with_attr("data-text", "item"))
            )])
    );
}

#[test]
fn test_argumentless_directive_needs_terminator() {
    // `elsewhere` is not the `else` directive
    assert_eq!(
        parsed("elsewhere"),
        document(vec![el("p").with_text("elsewhere")])
    );
    assert_eq!(
        parsed("default ~ off"),
        document(vec![el("div")
            .with_attr("data-default", "true")
            .with_attr("data-off", "true")])
    );
}

#[test]
fn test_flags() {
    assert_eq!(
        parsed("p if x ~ &a1B2 ^3 lock !\"bad thing\"@2,3 %\"careful\""),
        document(vec![el("p")
            .with_attr("data-if", "x")
            .with_attr("data-hash", "a1B2")
            .with_attr("data-index", "3")
            .with_attr("data-lock", "true")
            .with_attr("data-error", "bad thing@2,3")
            .with_attr("data-warning", "careful")])
    );
}

#[test]
fn test_inline_directive_with_content() {
    assert_eq!(
        parsed("The answer is {text answer : 42}."),
        document(vec![el("p")
            .with_text("The answer is ")
            .with_child(el("span").with_attr("data-text", "answer").with_text("42"))
            .with_text(".")])
    );
}

#[test]
fn test_emphasis_and_strong() {
    assert_eq!(
        parsed("Some *bold _and em_ text* here"),
        document(vec![el("p")
            .with_text("Some ")
            .with_child(
                el("strong")
                    .with_text("bold ")
                    .with_child(el("em").with_text("and em"))
                    .with_text(" text")
            )
            .with_text(" here")])
    );
    // An underscore inside a word is just text
    assert_eq!(
        parsed("snake_case"),
        document(vec![el("p").with_text("snake_case")])
    );
}

#[test]
fn test_emphasis_at_start_of_text() {
    assert_eq!(
        parsed("p _hi_ there"),
        document(vec![el("p")
            .with_child(el("em").with_text("hi"))
            .with_text(" there")])
    );
}

#[test]
fn test_code_and_math() {
    assert_eq!(
        parsed("Use `a\\`b` and |x^2| and \\(y\\)"),
        document(vec![el("p")
            .with_text("Use ")
            .with_child(el("code").with_text("a`b"))
            .with_text(" and ")
            .with_child(el("script").with_attr("type", "math/asciimath").with_text("x^2"))
            .with_text(" and ")
            .with_child(el("script").with_attr("type", "math/tex").with_text("y"))])
    );
}

#[test]
fn test_display_math() {
    assert_eq!(
        parsed("|E = mc^2|"),
        document(vec![el("p").with_attr("class", "equation").with_child(
            el("script")
                .with_attr("type", "math/asciimath; mode=display")
                .with_text("E = mc^2")
        )])
    );
}

#[test]
fn test_links() {
    assert_eq!(
        parsed("Go [home](http://x.org) or http://y.org or bob@z.com"),
        document(vec![el("p")
            .with_text("Go ")
            .with_child(el("a").with_attr("href", "http://x.org").with_text("home"))
            .with_text(" or ")
            .with_child(el("a").with_attr("href", "http://y.org").with_text("http://y.org"))
            .with_text(" or ")
            .with_child(
                el("a")
                    .with_attr("href", "mailto:bob@z.com")
                    .with_text("bob@z.com")
            )])
    );
}

#[test]
fn test_references_and_escaped_at() {
    assert_eq!(
        parsed("See @fig-1 not \\@home"),
        document(vec![el("p")
            .with_text("See ")
            .with_child(el("span").with_attr("data-refer", "#fig-1"))
            .with_text(" not @home")])
    );
}

#[test]
fn test_exec_block() {
    assert_eq!(
        parsed("r format png ~ &abc\n\tx <- 1\n\n\n\tplot(x)\n\np Done"),
        document(vec![
            el("pre")
                .with_attr("data-exec", "r format png")
                .with_attr("data-hash", "abc")
                .with_text("\nx <- 1\n\n\nplot(x)\n"),
            el("p").with_text("Done"),
        ])
    );
}

#[test]
fn test_blank_line_after_embed_starts_paragraph() {
    assert_eq!(
        parsed("r\n\tx <- 1\n\nAfter"),
        document(vec![
            el("pre").with_attr("data-exec", "r").with_text("\nx <- 1\n"),
            el("p").with_text("After"),
        ])
    );
    assert_eq!(
        parsed("css\n\tp {color: red}\n\nAfter"),
        document(vec![
            el("style")
                .with_attr("type", "text/css")
                .with_text("\np {color: red}\n"),
            el("p").with_text("After"),
        ])
    );
}

#[test]
fn test_text_directly_after_embed_is_not_a_paragraph() {
    assert_eq!(
        parsed("r\n\tx <- 1\nAfter"),
        document(vec![
            el("pre").with_attr("data-exec", "r").with_text("\nx <- 1\n"),
            Snapshot::text("After"),
        ])
    );
}

#[test]
fn test_exec_keeps_relative_indentation() {
    assert_eq!(
        parsed("py\n\tif x:\n\t\ty = 1"),
        document(vec![el("pre")
            .with_attr("data-exec", "py")
            .with_text("\nif x:\n\ty = 1\n")])
    );
}

#[test]
fn test_trailing_blank_lines_are_dropped_from_code() {
    let doc = parse("js\n\tlet a = 1\n\n\n");
    let pre = doc.children(doc.root())[0];
    assert_eq!(doc.text(pre), "\nlet a = 1\n");
}

#[test]
fn test_style_block() {
    assert_eq!(
        parsed("css\n\tp {color: red}"),
        document(vec![el("style")
            .with_attr("type", "text/css")
            .with_text("\np {color: red}\n")])
    );
}

#[test]
fn test_out_block() {
    assert_eq!(
        parsed("out\n\tpre 42"),
        document(vec![el("div")
            .with_attr("data-out", "true")
            .with_child(el("pre").with_text("42"))])
    );
}

#[test]
fn test_unbalanced_brace_falls_back_to_text() {
    assert!(matches!(
        try_parse("p a}"),
        Err(ParseError::Unbalanced { .. })
    ));
    assert_eq!(parsed("p a}"), document(vec![Snapshot::text("p a}")]));
}

#[test]
fn test_empty_input() {
    assert_eq!(parse(""), Document::new());
}
