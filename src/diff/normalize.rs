//! Attribute equality with the normalizations review screens expect.

use super::types::Attribute;
use serde_json::Value;

/// Collapse whitespace runs to one space and trim.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compare two attribute values. Free text ignores formatting-only
/// differences and optional flags treat absent as `false`.
pub fn values_equal(attribute: Attribute, old: &Value, new: &Value) -> bool {
    match attribute {
        Attribute::Comments | Attribute::Content => text_of(old) == text_of(new),
        Attribute::Increment | Attribute::IsArray => flag_of(old) == flag_of(new),
        _ => old == new,
    }
}

fn text_of(value: &Value) -> String {
    value.as_str().map(normalize_text).unwrap_or_default()
}

fn flag_of(value: &Value) -> bool {
    value.as_bool().unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  a \n\t b  "), "a b");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_whitespace_only_comment_changes_are_equal() {
        assert!(values_equal(Attribute::Comments, &json!("a  b"), &json!("a\nb")));
        assert!(!values_equal(Attribute::Comments, &json!("a b"), &json!("a c")));
        assert!(values_equal(Attribute::Comments, &Value::Null, &json!("   ")));
    }

    #[test]
    fn test_absent_flags_equal_false() {
        assert!(values_equal(Attribute::Increment, &Value::Null, &json!(false)));
        assert!(!values_equal(Attribute::IsArray, &Value::Null, &json!(true)));
    }

    #[test]
    fn test_other_attributes_are_exact() {
        assert!(!values_equal(Attribute::Name, &json!("Users"), &json!("users")));
        assert!(!values_equal(Attribute::Nullable, &Value::Null, &json!(false)));
    }
}
