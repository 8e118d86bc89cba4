/// Tests for generating Cila from documents
use crate::*;
use stencil_dom::{Document, Snapshot};

fn generated(snapshot: Snapshot) -> String {
    serialize(&Document::from_snapshot(&snapshot))
}

#[test]
fn test_paragraph_shorthand() {
    assert_eq!(serialize(&parse("p Hello")), "Hello");
}

#[test]
fn test_list_shorthand() {
    assert_eq!(serialize(&parse("ul\n\t- one\n\t- two")), "- one\n- two");
    assert_eq!(serialize(&parse("ol\n\t1. one\n\t2. two")), "1. one\n2. two");
}

#[test]
fn test_list_with_attributes_is_canonical() {
    let list = Snapshot::element("ul")
        .with_child(Snapshot::element("li").with_attr("class", "x").with_text("one"));
    assert_eq!(generated(list), "ul\n\tli .x one");
}

#[test]
fn test_directive_children_are_indented() {
    assert_eq!(serialize(&parse("if x > 1\n\tp Yes")), "if x > 1\n\n\tYes");
}

#[test]
fn test_exec_code_is_indented() {
    assert_eq!(serialize(&parse("r\n\tx <- 1")), "r\n\tx <- 1");
}

#[test]
fn test_text_escapes() {
    let p = Snapshot::element("p").with_text("a|b@c`d");
    assert_eq!(generated(p), "a\\|b\\@c\\`d");
}

#[test]
fn test_flag_messages_use_single_quotes() {
    let div = Snapshot::element("div").with_attr("data-error", "bad \"x\"@1,2");
    assert_eq!(generated(div), "div ~ !\"bad 'x'\"@1,2");
}

#[test]
fn test_section_shorthand() {
    assert_eq!(
        serialize(&parse("> Intro\n\n\tText")),
        "> Intro\n\n\tText"
    );
}

#[test]
fn test_section_with_mismatched_id_is_canonical() {
    let section = Snapshot::element("section")
        .with_attr("id", "other")
        .with_child(Snapshot::element("h1").with_text("Intro"));
    assert_eq!(generated(section), "section #other\n\th1 Intro");
}

#[test]
fn test_inline_element_with_attributes() {
    let p = Snapshot::element("p")
        .with_text("a ")
        .with_child(Snapshot::element("span").with_attr("class", "x").with_text("b"));
    assert_eq!(generated(p), "p : a {span .x b}");
}

#[test]
fn test_refer_with_spaces_is_canonical() {
    let p = Snapshot::element("p").with_child(
        Snapshot::element("span").with_attr("data-refer", "#a b"),
    );
    assert_eq!(generated(p), "{refer #a b}");
}

#[test]
fn test_custom_indent() {
    let doc = parse("div\n\tdiv\n\t\tpre x");
    assert_eq!(
        Serializer::with_indent("  ").serialize(&doc),
        "div\n  div\n    pre x"
    );
}
