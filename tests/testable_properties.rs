//! End-to-end behaviour of the public surface: pruning, fail-fast vs.
//! aggregation, sentinels, refinement ordering, enums.
use json_guard::{
    Literal, ParseResult, PathSegment, SchemaEnum, Value, array, boolean, enumeration, literal,
    native_enum, number, object, string, union,
};
use serde_json::json;

fn v(json: serde_json::Value) -> Value {
    Value::from(json)
}

#[test]
fn object_drops_unknown_keys() {
    let schema = object([("a", number()), ("b", number())]);
    let out = schema.parse(&v(json!({"a": 1, "b": 2, "c": 3}))).unwrap();
    assert_eq!(out, v(json!({"a": 1, "b": 2})));
    assert!(out.get("c").is_none());
}

#[test]
fn array_reports_only_first_bad_index() {
    let err = array(number()).parse(&v(json!([1, "x", 2]))).unwrap_err();
    assert_eq!(err.issues().len(), 1);
    assert_eq!(err.first().path.segments(), [PathSegment::Index(1)]);

    let err = array(number()).parse(&v(json!([1, "x", "y"]))).unwrap_err();
    assert!(err.issues().iter().all(|i| i.path.segments() != [PathSegment::Index(2)]));
}

#[test]
fn union_collects_every_branch() {
    let result = union([literal("a"), literal("b")]).safe_parse(&v(json!("c")));
    let ParseResult::Failure(err) = result else {
        panic!("expected failure");
    };
    let expected: Vec<&str> = err.issues().iter().map(|i| i.expected.as_str()).collect();
    assert_eq!(expected, [r#"literal "a""#, r#"literal "b""#]);
}

#[test]
fn optional_and_nullable_are_independent() {
    assert!(string().optional().parse(&Value::Null).is_err());
    assert!(string().nullable().parse(&Value::Undefined).is_err());

    let both = string().optional().nullable();
    assert_eq!(both.parse(&Value::Null).unwrap(), Value::Null);
    assert_eq!(both.parse(&Value::Undefined).unwrap(), Value::Undefined);
}

#[test]
fn first_failing_refinement_wins() {
    let schema = string().refine(|_| false, "A").refine(|_| false, "B");
    let err = schema.parse(&v(json!("x"))).unwrap_err();
    let messages: Vec<&str> = err.issues().iter().map(|i| i.message.as_str()).collect();
    assert_eq!(messages, ["A"]);
}

#[test]
fn ordinal_enum_membership() {
    let schema = enumeration([0, 1]);
    assert!(schema.parse(&v(json!(0))).is_ok());
    assert!(schema.parse(&v(json!(1))).is_ok());
    assert!(schema.parse(&v(json!(2))).is_err());
}

#[derive(Debug, Clone, Copy)]
enum Priority {
    Low = 0,
    High = 1,
}

impl SchemaEnum for Priority {
    fn values() -> Vec<Literal> {
        vec![Literal::from(Priority::Low as i64), Literal::from(Priority::High as i64)]
    }
}

#[test]
fn enum_from_rust_type() {
    let schema = native_enum::<Priority>();
    assert!(schema.parse(&v(json!(1))).is_ok());
    let err = schema.parse(&v(json!("High"))).unwrap_err();
    assert_eq!(err.first().received, "string");
}

#[test]
fn deep_failure_pinpoints_location() {
    let schema = object([
        ("config", object([
            ("servers", array(object([
                ("host", string()),
                ("tls", boolean().optional()),
            ]))),
        ])),
    ]);
    let data = v(json!({
        "config": { "servers": [
            { "host": "a" },
            { "host": "b", "tls": "yes" },
        ]}
    }));
    let err = schema.parse(&data).unwrap_err();
    let issue = err.first();
    assert_eq!(issue.path.to_string(), "$.config.servers[1].tls");
    assert_eq!(issue.expected, "boolean");
    assert_eq!(issue.received, "string");
    assert!(issue.message.contains(r#""yes""#));
}

#[test]
fn schemas_are_reusable_across_calls() {
    let schema = object([("n", number())]);
    for i in 0..3 {
        assert_eq!(schema.parse(&v(json!({"n": i}))).unwrap(), v(json!({"n": i})));
        assert!(schema.parse(&v(json!({"n": "x"}))).is_err());
    }
}
