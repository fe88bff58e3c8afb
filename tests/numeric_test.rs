//! Integration tests for the numeric checkers.

use scrutiny::{codes, Checker, Schema};
use serde_json::json;

#[test]
fn test_int_accepts_integers() {
    for value in [json!(0), json!(-5), json!(i64::MAX), json!(2.0)] {
        assert!(Schema::int().check(&value).is_ok(), "{} should pass", value);
    }
}

#[test]
fn test_int_rejects_other_values() {
    for value in [json!(1.5), json!("1"), json!(null), json!([1]), json!(false)] {
        let error = Schema::int().check(&value).unwrap_err();
        assert_eq!(error.message(), Some("value is not int"));
        assert_eq!(error.code, codes::IS_NOT_INT);
        assert_eq!(error.value, Some(value));
    }
}

#[test]
fn test_int_rejects_integers_beyond_i64() {
    let parsed: serde_json::Value = serde_json::from_str("9223372036854775808").unwrap();
    for value in [parsed, json!(u64::MAX), json!(9_223_372_036_854_775_808.0_f64)] {
        let error = Schema::int().check(&value).unwrap_err();
        assert_eq!(error.code, codes::IS_NOT_INT);
        assert_eq!(error.value, Some(value));
    }
    assert_eq!(Schema::int().check(&json!(i64::MIN)).unwrap(), json!(i64::MIN));
}

#[test]
fn test_int_bounds() {
    let schema = Schema::int().gte(1).lte(10);
    assert!(schema.check(&json!(1)).is_ok());
    assert!(schema.check(&json!(10)).is_ok());

    let error = schema.check(&json!(0)).unwrap_err();
    assert_eq!(error.message(), Some("value is less than 1"));
    assert_eq!(error.code, codes::TOO_SMALL);

    let error = schema.check(&json!(11)).unwrap_err();
    assert_eq!(error.message(), Some("value is greater than 10"));
    assert_eq!(error.code, codes::TOO_BIG);
}

#[test]
fn test_int_exclusive_bounds() {
    let schema = Schema::int().gt(0).lt(5);
    assert_eq!(
        schema.check(&json!(0)).unwrap_err().message(),
        Some("value should be greater than 0")
    );
    assert_eq!(
        schema.check(&json!(5)).unwrap_err().message(),
        Some("value should be less than 5")
    );
    assert!(schema.check(&json!(4)).is_ok());
}

#[test]
fn test_int_conversion() {
    let schema = Schema::int().convert().range(1..=100);
    assert_eq!(schema.check(&json!("42")).unwrap(), json!(42));
    assert_eq!(
        schema.check(&json!("0")).unwrap_err().message(),
        Some("value is less than 1")
    );
    assert_eq!(
        schema.check(&json!("4.2")).unwrap_err().message(),
        Some("value can't be converted to int")
    );
    assert_eq!(schema.describe(), "<ToInt(gte=1, lte=100)>");
}

#[test]
fn test_float() {
    let schema = Schema::float().gt(0.0);
    assert_eq!(schema.check(&json!(1.5)).unwrap(), json!(1.5));
    assert_eq!(schema.check(&json!(2)).unwrap(), json!(2.0));
    assert_eq!(
        schema.check(&json!(0)).unwrap_err().message(),
        Some("value should be greater than 0")
    );
    assert_eq!(schema.check(&json!("1.5")).unwrap_err().message(), Some("value is not float"));
}

#[test]
fn test_float_conversion() {
    let schema = Schema::float().convert();
    assert_eq!(schema.check(&json!(" 2.5 ")).unwrap(), json!(2.5));

    let error = schema.check(&json!("nan")).unwrap_err();
    assert_eq!(error.message(), Some("value can't be converted to float"));
    assert_eq!(error.code, codes::IS_NOT_A_NUMBER);
}

#[test]
fn test_conversion_is_idempotent() {
    let to_int = Schema::int().convert();
    let to_float = Schema::float().convert();
    for raw in [json!("7"), json!(7)] {
        let once = to_int.check(&raw).unwrap();
        assert_eq!(to_int.check(&once).unwrap(), once);
        let once = to_float.check(&raw).unwrap();
        assert_eq!(to_float.check(&once).unwrap(), once);
    }
}
