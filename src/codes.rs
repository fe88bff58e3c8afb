//! Stable machine-readable error codes carried by [`DataError::code`].
//!
//! [`DataError::code`]: crate::DataError

pub const VALIDATION_ERROR: &str = "validation_error";

pub const IS_NOT_NULL: &str = "is_not_null";
pub const IS_NOT_BOOL: &str = "is_not_bool";
pub const IS_NOT_EXACTLY: &str = "is_not_exactly";
pub const DOES_NOT_MATCH_ANY_VARIANT: &str = "does_not_match_any_variant";
pub const WRONG_TYPE: &str = "wrong_type";

pub const IS_NOT_A_STRING: &str = "is_not_a_string";
pub const EMPTY_STRING: &str = "empty_string";
pub const SHORT_STRING: &str = "short_string";
pub const LONG_STRING: &str = "long_string";
pub const DOES_NOT_MATCH_PATTERN: &str = "does_not_match_pattern";

pub const IS_NOT_A_NUMBER: &str = "is_not_a_number";
pub const IS_NOT_INT: &str = "is_not_int";
pub const TOO_SMALL: &str = "too_small";
pub const TOO_BIG: &str = "too_big";

pub const IS_NOT_A_LIST: &str = "is_not_a_list";
pub const TOO_SHORT: &str = "too_short";
pub const TOO_LONG: &str = "too_long";

pub const IS_NOT_A_TUPLE: &str = "is_not_a_tuple";
pub const WRONG_LENGTH: &str = "wrong_length";

pub const IS_NOT_A_DICT: &str = "is_not_a_dict";
pub const REQUIRED: &str = "required";
pub const NOT_ALLOWED: &str = "not_allowed";
pub const SHADOWED: &str = "shadowed";
pub const NOT_EQUAL: &str = "not_equal";
pub const MUTUALLY_EXCLUSIVE: &str = "mutually_exclusive";

pub const NOTHING_MATCH: &str = "nothing_match";
pub const SOME_ELEMENTS_DID_NOT_MATCH: &str = "some_elements_did_not_match";
pub const PAIR_MEMBERS_DID_NOT_MATCH: &str = "pair_members_did_not_match";

/// Raised by a forward checker that has not been bound yet.
pub const TRAFARET_IS_NOT_SET: &str = "trafaret_is_not_set";

/// Raised by a forward checker whose registry no longer exists.
pub const FORWARD_REGISTRY_DROPPED: &str = "forward_registry_dropped";
