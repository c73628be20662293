//! Wrapper-envelope normalization of parsed documents.
//!
//! Generators sometimes nest the requested payload under a conventional
//! wrapper key (`data`, `result`, `output`). The normalizer probes that
//! fixed candidate list exactly once; anything it cannot resolve is
//! returned unchanged so downstream validation fails loudly instead of
//! operating on the wrong subtree.

use serde_json::Value;

/// Conventional wrapper keys probed, in order.
pub const WRAPPER_KEYS: [&str; 3] = ["data", "result", "output"];

/// Locates the expected logical root of `doc`.
///
/// - A root object already containing any of `expected_keys` is returned
///   unchanged.
/// - Otherwise, when exactly one wrapper key maps to an object containing
///   an expected key, that nested object is returned.
/// - In every other case (no match, ambiguous match, non-object root) the
///   document is returned unchanged.
pub fn normalize_root(doc: Value, expected_keys: &[&str]) -> Value {
    match single_wrapper(&doc, expected_keys) {
        Some(wrapper) => {
            if let Value::Object(mut map) = doc {
                if let Some(inner) = map.remove(wrapper) {
                    return inner;
                }
                Value::Object(map)
            } else {
                doc
            }
        }
        None => doc,
    }
}

/// Returns the single wrapper key holding the payload, when the root lacks
/// every expected key and exactly one wrapper candidate matches.
fn single_wrapper(doc: &Value, expected_keys: &[&str]) -> Option<&'static str> {
    let map = doc.as_object()?;
    if expected_keys.iter().any(|key| map.contains_key(*key)) {
        return None;
    }

    let mut candidates = WRAPPER_KEYS.iter().copied().filter(|wrapper| {
        map.get(*wrapper)
            .and_then(Value::as_object)
            .is_some_and(|inner| expected_keys.iter().any(|key| inner.contains_key(*key)))
    });
    match (candidates.next(), candidates.next()) {
        (Some(wrapper), None) => Some(wrapper),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const EXPECTED: [&str; 3] = ["plan", "recipes", "day"];

    #[test]
    fn test_root_with_expected_key_unchanged() {
        let doc = json!({"recipes": []});
        assert_eq!(normalize_root(doc.clone(), &EXPECTED), doc);
    }

    #[test]
    fn test_unwraps_single_matching_wrapper() {
        let doc = json!({"result": {"day": "Monday", "menus": []}});
        assert_eq!(
            normalize_root(doc, &EXPECTED),
            json!({"day": "Monday", "menus": []})
        );
    }

    #[test]
    fn test_ambiguous_wrappers_left_alone() {
        let doc = json!({
            "data": {"recipes": []},
            "result": {"recipes": []},
        });
        assert_eq!(normalize_root(doc.clone(), &EXPECTED), doc);
    }

    #[test]
    fn test_wrapper_without_expected_key_left_alone() {
        let doc = json!({"data": {"other": 1}});
        assert_eq!(normalize_root(doc.clone(), &EXPECTED), doc);
    }

    #[test]
    fn test_no_deeper_probing() {
        let doc = json!({"data": {"inner": {"recipes": []}}});
        assert_eq!(normalize_root(doc.clone(), &EXPECTED), doc);
    }

    #[test]
    fn test_non_object_root_unchanged() {
        let doc = json!([1, 2, 3]);
        assert_eq!(normalize_root(doc.clone(), &EXPECTED), doc);
    }
}
