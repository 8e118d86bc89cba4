/// Tests for the JSON backed context
use crate::context::Context;
use crate::error::ContextError;
use crate::map_context::MapContext;
use serde_json::json;

fn context() -> MapContext {
    MapContext::from_json(json!({
        "name": "Ada",
        "age": 36,
        "ratio": 0.5,
        "tags": ["math", "engines"],
        "address": {"city": "London"},
        "empty": "",
        "nothing": null
    }))
    .unwrap()
}

#[test]
fn test_write() {
    let mut context = context();
    assert_eq!(context.write("name").unwrap(), "Ada");
    assert_eq!(context.write("age").unwrap(), "36");
    assert_eq!(context.write("ratio").unwrap(), "0.5");
    assert_eq!(context.write("address.city").unwrap(), "London");
    assert_eq!(context.write("tags.1").unwrap(), "engines");
    assert_eq!(context.write("tags").unwrap(), r#"["math","engines"]"#);
    assert_eq!(context.write("nothing").unwrap(), "");
    assert_eq!(context.write("'quoted'").unwrap(), "quoted");
    assert_eq!(context.write("-2").unwrap(), "-2");
}

#[test]
fn test_errors() {
    let mut context = context();
    assert_eq!(
        context.write("missing"),
        Err(ContextError::Evaluation("'missing' is not defined".to_string()))
    );
    assert!(context.write("address.town").is_err());
    assert!(context.write("a + b").is_err());
    assert!(context.test("name > 1").is_err());
    assert!(MapContext::from_json(json!([1, 2])).is_err());
}

#[test]
fn test_test() {
    let mut context = context();
    assert!(context.test("name").unwrap());
    assert!(!context.test("empty").unwrap());
    assert!(!context.test("nothing").unwrap());
    assert!(context.test("age > 30").unwrap());
    assert!(context.test("age == 36.0").unwrap());
    assert!(!context.test("age <= 35").unwrap());
    assert!(context.test("name == 'Ada'").unwrap());
    assert!(context.test("name != \"Bob\"").unwrap());
    assert!(context.test("'a >= b' == 'a >= b'").unwrap());
    assert!(context.test("!empty").unwrap());
    assert!(context.test("not nothing").unwrap());
}

#[test]
fn test_switch_marks() {
    let mut context = context();
    context.mark("age").unwrap();
    assert!(!context.matches("35").unwrap());
    assert!(context.matches("36").unwrap());
    context.mark("name").unwrap();
    assert!(context.matches("'Ada'").unwrap());
    context.unmark();
    assert!(context.matches("36").unwrap());
    context.unmark();
    assert!(context.matches("36").is_err());
}

#[test]
fn test_loops() {
    let mut context = context();
    let mut seen = Vec::new();
    let mut more = context.begin("tag", "tags").unwrap();
    while more {
        seen.push(context.write("tag").unwrap());
        more = context.next().unwrap();
    }
    assert_eq!(seen, vec!["math", "engines"]);
    assert!(context.get("tag").is_none());
    assert_eq!(context.depth(), 1);

    assert!(!context.begin("x", "nothing").unwrap());
    assert!(context.begin("x", "age").is_err());
}

#[test]
fn test_scopes() {
    let mut context = context();
    context.enter("address").unwrap();
    assert_eq!(context.write("city").unwrap(), "London");
    // Outer variables stay visible
    assert_eq!(context.write("name").unwrap(), "Ada");
    context.assign("name", "'Grace'").unwrap();
    assert_eq!(context.write("name").unwrap(), "Grace");
    context.exit();
    assert_eq!(context.write("name").unwrap(), "Ada");

    context.enter("").unwrap();
    assert_eq!(context.depth(), 2);
    context.exit();
    context.exit();
    assert_eq!(context.depth(), 1);

    assert!(context.enter("age").is_err());
}

#[test]
fn test_input() {
    let mut context = MapContext::new();
    context.input("n", "number", "3").unwrap();
    context.input("ok", "boolean", "true").unwrap();
    context.input("s", "", "hello").unwrap();
    assert_eq!(context.get("n"), Some(&json!(3)));
    assert_eq!(context.get("ok"), Some(&json!(true)));
    assert_eq!(context.get("s"), Some(&json!("hello")));
    assert!(context.input("n", "number", "three").is_err());
}

#[test]
fn test_execute_assigns() {
    let mut context = MapContext::new();
    assert!(context.accept("map"));
    assert!(!context.accept("py"));
    context
        .execute("x = 1\n\ny = x == 1\n", "id", "", "", "", "")
        .unwrap();
    assert_eq!(context.get("x"), Some(&json!(1)));
    assert_eq!(context.get("y"), Some(&json!(true)));
    assert!(context.execute("oops", "id", "", "", "", "").is_err());
}
