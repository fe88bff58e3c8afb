//! Tests for list and tuple checkers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use scrutiny::{codes, Call, Checker, CheckerExt, DataError, PathSegment, Schema};
use serde_json::{json, Value};

fn counting_checker(calls: &Arc<AtomicUsize>) -> Call {
    let calls = Arc::clone(calls);
    Call::new(move |value: &Value| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(value.clone())
    })
}

#[test]
fn test_list_collects_every_failing_index() {
    let schema = Schema::list(Schema::int());
    let input = json!([1, "a", 2, null, 3, 4.5]);

    let error = schema.check(&input).unwrap_err();
    let errors = error.errors().expect("aggregate error");

    let failing: Vec<&PathSegment> = errors.keys().collect();
    assert_eq!(
        failing,
        vec![&PathSegment::Index(1), &PathSegment::Index(3), &PathSegment::Index(5)]
    );
    assert_eq!(error.code, codes::SOME_ELEMENTS_DID_NOT_MATCH);
}

#[test]
fn test_list_checks_elements_after_a_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let schema = Schema::list(Schema::int().and_then(counting_checker(&calls)));

    let error = schema.check(&json!(["x", 1, "y", 2])).unwrap_err();
    assert_eq!(error.errors().map(|e| e.len()), Some(2));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_list_length_checks_skip_elements() {
    let calls = Arc::new(AtomicUsize::new(0));
    let schema = Schema::list(counting_checker(&calls)).min_len(2);

    let error = schema.check(&json!(["only"])).unwrap_err();
    assert_eq!(error.message(), Some("list length is less than 2"));
    assert_eq!(error.code, codes::TOO_SHORT);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let schema = Schema::list(counting_checker(&calls)).max_len(1);
    let error = schema.check(&json!([1, 2])).unwrap_err();
    assert_eq!(error.code, codes::TOO_LONG);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_list_non_list_input() {
    for value in [json!("abc"), json!(1), json!({"0": 1}), json!(null)] {
        let error = Schema::list(Schema::any()).check(&value).unwrap_err();
        assert_eq!(error.code, codes::IS_NOT_A_LIST);
        assert_eq!(error.value, Some(value));
    }
}

#[test]
fn test_list_converts_elements() {
    let schema = Schema::list(Schema::int().convert());
    assert_eq!(schema.check(&json!(["1", "2", 3])).unwrap(), json!([1, 2, 3]));
}

#[test]
fn test_list_is_idempotent() {
    let schema = Schema::list(Schema::int().convert());
    let once = schema.check(&json!([" 1", "2"])).unwrap();
    assert_eq!(schema.check(&once).unwrap(), once);
}

#[test]
fn test_nested_list_errors_keep_shape() {
    let schema = Schema::list(Schema::list(Schema::int()));
    let error = schema.check(&json!([[1], [2, "x"], "y"])).unwrap_err();

    assert_eq!(
        error.as_dict(false).to_json(),
        json!({"1": {"1": "value is not int"}, "2": "value is not a list"})
    );
}

#[test]
fn test_tuple_arity_mismatch_is_whole_value() {
    let schema = Schema::tuple(vec![Schema::int().shared(), Schema::int().shared(), Schema::string().shared()]);

    let error = schema.check(&json!([5])).unwrap_err();
    assert!(!error.is_nested());
    assert_eq!(error.message(), Some("value must contain 3 items"));
    assert_eq!(error.code, codes::WRONG_LENGTH);
}

#[test]
fn test_tuple_collects_position_errors() {
    let schema = Schema::tuple(vec![Schema::int().shared(), Schema::int().shared(), Schema::string().shared()]);

    assert_eq!(schema.check(&json!([3, 4, "5"])).unwrap(), json!([3, 4, "5"]));

    let error = schema.check(&json!([3, "4", 5])).unwrap_err();
    assert_eq!(
        error.as_dict(false).to_json(),
        json!({"1": "value is not int", "2": "value is not a string"})
    );
}

#[test]
fn test_tuple_rejects_objects() {
    let schema = Schema::tuple(vec![Schema::any().shared()]);
    let error = schema.check(&json!({"a": 1})).unwrap_err();
    assert_eq!(error.message(), Some("value must be convertible to tuple"));
}

#[test]
fn test_element_errors_keep_their_own_code() {
    let bad = Call::new(|_: &Value| Err(DataError::new("nope").with_code("custom")));
    let error = Schema::list(bad).check(&json!([1])).unwrap_err();
    assert_eq!(error.get(0usize).map(|e| e.code.as_str()), Some("custom"));
}
