//! Append-only assembly of the growing plan document.
//!
//! Each sub-job contributes a disjoint subtree (a week, or a batch of recipe
//! objects), so merging never rewrites existing entries. Concurrent callers
//! only need to serialize the append itself.

use serde_json::Value;

use crate::{MealPlan, WeekPlan};

/// Appends a completed week to the plan.
///
/// Weeks are kept in the order they are appended; the caller assigns week
/// numbers before the append.
pub fn append_week(plan: &mut MealPlan, week: WeekPlan) {
    plan.weeks.push(week);
}

/// Extracts the recipe objects from a normalized fragment.
///
/// Accepts either a `{"recipes": [...]}` document or a bare array root, and
/// returns an empty list for anything else. Entries are returned as raw
/// values; key derivation tolerates partially-formed objects, so nothing is
/// filtered here.
pub fn recipe_entries(fragment: &Value) -> Vec<Value> {
    match fragment {
        Value::Object(map) => map
            .get("recipes")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        Value::Array(entries) => entries.clone(),
        _ => Vec::new(),
    }
}

/// Appends a fragment's recipe objects to the accumulator.
pub fn extend_recipes(accumulator: &mut Vec<Value>, fragment: &Value) {
    accumulator.extend(recipe_entries(fragment));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recipe_entries_from_object_root() {
        let fragment = json!({"recipes": [{"name": "Stew"}, {"name": "Soup"}]});
        assert_eq!(recipe_entries(&fragment).len(), 2);
    }

    #[test]
    fn test_recipe_entries_from_array_root() {
        let fragment = json!([{"name": "Stew"}]);
        assert_eq!(recipe_entries(&fragment).len(), 1);
    }

    #[test]
    fn test_recipe_entries_empty_for_other_shapes() {
        assert!(recipe_entries(&json!({"plan": {}})).is_empty());
        assert!(recipe_entries(&json!("text")).is_empty());
    }

    #[test]
    fn test_extend_recipes_is_append_only() {
        let mut accumulator = vec![json!({"name": "Stew"})];
        extend_recipes(&mut accumulator, &json!({"recipes": [{"name": "Soup"}]}));
        assert_eq!(accumulator.len(), 2);
        assert_eq!(accumulator[0]["name"], "Stew");
    }

    #[test]
    fn test_append_week_preserves_order() {
        let mut plan = MealPlan::new(1, vec!["Classic".into()]);
        append_week(&mut plan, WeekPlan::new(1));
        append_week(&mut plan, WeekPlan::new(2));
        assert_eq!(plan.weeks.len(), 2);
        assert_eq!(plan.weeks[1].week, 2);
    }
}
