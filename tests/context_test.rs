//! Tests for threading the check context through containers.

use scrutiny::keys::subdict;
use scrutiny::{Call, Checker, CheckerExt, DataError, Dict, Key, List, Schema};
use serde_json::{json, Value};

/// Accepts only values equal to the `"expected"` member of the context.
fn expected_from_context() -> Call {
    Call::with_context(|value: &Value, context: Option<&Value>| {
        match context.and_then(|c| c.get("expected")) {
            Some(expected) if expected == value => Ok(value.clone()),
            Some(_) => Err(DataError::new("unexpected value").with_value(value.clone())),
            None => Err(DataError::new("have not context there")),
        }
    })
    .named("expected")
}

#[test]
fn test_context_reaches_every_container() {
    let schema = Dict::new()
        .field("list", List::new(expected_from_context()))
        .field("tuple", Schema::tuple(vec![expected_from_context().shared()]))
        .field("map", Schema::mapping(Schema::string(), expected_from_context()))
        .field("alt", Schema::null().or_else(expected_from_context()))
        .field("seq", Schema::any().and_then(expected_from_context()));
    let context = json!({"expected": 7});
    let value = json!({"list": [7, 7], "tuple": [7], "map": {"a": 7}, "alt": 7, "seq": 7});

    assert_eq!(schema.check_with_context(&value, Some(&context)).unwrap(), value);

    let error = schema.check(&value).unwrap_err();
    assert_eq!(error.errors().map(|e| e.len()), Some(5));
}

#[test]
fn test_context_reaches_keys_and_extras() {
    let schema = Dict::new()
        .key(Key::new("a").checker(expected_from_context()).default(json!(7)))
        .extractor(subdict("sum", [Key::new("b").checker(expected_from_context())], Schema::any()))
        .allow_extra_with(["*"], expected_from_context());
    let context = json!({"expected": 7});

    let result = schema
        .check_with_context(&json!({"b": 7, "c": 7}), Some(&context))
        .unwrap();
    assert_eq!(result, json!({"a": 7, "sum": {"b": 7}, "c": 7}));

    let error = schema
        .check_with_context(&json!({"b": 1, "c": 2}), Some(&context))
        .unwrap_err();
    assert_eq!(
        error.as_dict(true).to_json(),
        json!({"b": "unexpected value, got 1", "c": "unexpected value, got 2"})
    );
}

#[test]
fn test_context_reaches_forward() {
    let registry = scrutiny::ForwardRegistry::new();
    let forward = registry.forward();
    forward.provide(List::new(expected_from_context())).unwrap();

    let context = json!({"expected": "x"});
    assert!(forward.check_with_context(&json!(["x"]), Some(&context)).is_ok());
    assert!(forward.check_with_context(&json!(["y"]), Some(&context)).is_err());
}

#[test]
fn test_call_error_names_the_function() {
    let error = expected_from_context().check(&json!(1)).unwrap_err();
    assert_eq!(error.checker.as_deref(), Some("<Call(expected)>"));
}
