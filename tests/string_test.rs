//! Integration tests for the string checker.

use scrutiny::{codes, Checker, Schema, SchemaDefinitionError};
use serde_json::json;

#[test]
fn test_string_accepts_and_returns_value() {
    let schema = Schema::string();
    assert_eq!(schema.check(&json!("hello")).unwrap(), json!("hello"));
}

#[test]
fn test_string_type_errors() {
    for value in [json!(1), json!(null), json!(["a"]), json!({"a": "b"}), json!(true)] {
        let error = Schema::string().check(&value).unwrap_err();
        assert_eq!(error.message(), Some("value is not a string"));
        assert_eq!(error.code, codes::IS_NOT_A_STRING);
    }
}

#[test]
fn test_blank_handling() {
    let error = Schema::string().check(&json!("")).unwrap_err();
    assert_eq!(error.code, codes::EMPTY_STRING);

    let schema = Schema::string().allow_blank().min_len(3);
    assert_eq!(schema.check(&json!("")).unwrap(), json!(""));
    assert_eq!(
        schema.check(&json!("ab")).unwrap_err().message(),
        Some("String is shorter than 3 characters")
    );
}

#[test]
fn test_length_codes() {
    let schema = Schema::string().min_len(2).max_len(3);
    assert_eq!(schema.check(&json!("a")).unwrap_err().code, codes::SHORT_STRING);
    assert_eq!(schema.check(&json!("abcd")).unwrap_err().code, codes::LONG_STRING);
    assert!(schema.check(&json!("日本語")).is_ok());
}

#[test]
fn test_pattern() {
    let schema = Schema::string().pattern(r"^\d{3}-\d{4}$").unwrap();
    assert!(schema.check(&json!("555-1234")).is_ok());

    let error = schema.check(&json!("5551234")).unwrap_err();
    assert_eq!(error.code, codes::DOES_NOT_MATCH_PATTERN);
    assert_eq!(
        error.as_dict(true).to_json(),
        json!(r#"does not match pattern ^\d{3}-\d{4}$, got "5551234""#)
    );
}

#[test]
fn test_invalid_pattern_is_a_definition_error() {
    let result = Schema::string().pattern("[");
    assert!(matches!(result, Err(SchemaDefinitionError::InvalidPattern(_))));
}

#[test]
fn test_first_violation_wins() {
    let schema = Schema::string().max_len(2).pattern("^x").unwrap();
    assert_eq!(
        schema.check(&json!("abc")).unwrap_err().message(),
        Some("String is longer than 2 characters")
    );
}
