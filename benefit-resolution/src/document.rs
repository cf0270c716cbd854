// Missingness rules for raw eligibility values
use crate::error::{ResolutionError, ResolutionResult};
use serde_json::Value;

/// Strings clearinghouses use in place of a real value. Compared
/// case-insensitively after trimming.
pub const MISSING_SENTINELS: [&str; 10] = [
    "",
    "not found",
    "n/a",
    "unknown",
    "null",
    "none",
    "not applicable",
    "information not available",
    "not covered",
    "see plan documents",
];

/// True when a resolved value carries no usable information.
///
/// Numeric zero and `false` are real values and count as present.
pub fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => {
            let normalized = text.trim().to_lowercase();
            MISSING_SENTINELS.contains(&normalized.as_str())
        }
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Bool(_) | Value::Number(_)) => false,
    }
}

/// Reject documents that cannot be traversed as a key/value structure at all.
pub fn ensure_traversable(document: &Value) -> ResolutionResult<()> {
    if document.is_object() {
        Ok(())
    } else {
        Err(ResolutionError::MalformedDocument(format!(
            "expected a JSON object at the root, got {}",
            json_kind(document)
        )))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sentinels_are_missing_case_insensitively() {
        for sentinel in ["N/A", "  Not Found ", "SEE PLAN DOCUMENTS", "Information Not Available", ""] {
            assert!(is_missing(Some(&json!(sentinel))), "{sentinel:?} should be missing");
        }
    }

    #[test]
    fn test_null_and_empty_collections_are_missing() {
        assert!(is_missing(None));
        assert!(is_missing(Some(&Value::Null)));
        assert!(is_missing(Some(&json!([]))));
        assert!(is_missing(Some(&json!({}))));
    }

    #[test]
    fn test_zero_and_false_are_present() {
        assert!(!is_missing(Some(&json!(0))));
        assert!(!is_missing(Some(&json!(0.0))));
        assert!(!is_missing(Some(&json!(false))));
        assert!(!is_missing(Some(&json!("0"))));
    }

    #[test]
    fn test_real_values_are_present() {
        assert!(!is_missing(Some(&json!("calendar_year"))));
        assert!(!is_missing(Some(&json!({ "times_per_period": 2 }))));
        assert!(!is_missing(Some(&json!(["#14"]))));
    }

    #[test]
    fn test_non_object_root_is_malformed() {
        assert!(ensure_traversable(&json!({})).is_ok());
        let err = ensure_traversable(&json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("an array"));
        assert!(ensure_traversable(&json!("eligibility")).is_err());
        assert!(ensure_traversable(&Value::Null).is_err());
    }
}
