//! Item keys: the structural identity of one expected recipe.
//!
//! A key must be derivable both from the request (the plan a sub-job was
//! asked to cover) and from the response (the recipe objects that came
//! back), using the same rule, so the two sets are directly comparable.
//! Derivation is a pure function of the fragment's fields; it never depends
//! on parse order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use mealplan_core::MealPlan;

/// Identity of one expected recipe: which week, day, and menu line it
/// belongs to, plus the primary label of its dish.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecipeKey {
    pub week: u32,
    pub day: String,
    pub menu: String,
    pub dish: String,
}

/// Reduces a free-text dish title to its primary label by cutting at the
/// first conjunction or dash separator.
///
/// Generators title recipes like "Roast chicken with rosemary potatoes"
/// for a planned main course of "Roast chicken"; comparing primary labels
/// lets the two meet. The separator list is configurable because the rule
/// is a lossy heuristic and the right cut points depend on the input
/// domain.
#[derive(Debug, Clone)]
pub struct LabelRule {
    separators: Vec<String>,
}

impl Default for LabelRule {
    fn default() -> Self {
        Self::new(&[" with ", " - ", " \u{2013} "])
    }
}

impl LabelRule {
    pub fn new(separators: &[&str]) -> Self {
        Self {
            separators: separators.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Returns the title up to the earliest separator occurrence, trimmed.
    pub fn primary_label(&self, title: &str) -> String {
        let mut cut = title.len();
        for separator in &self.separators {
            if let Some(position) = title.find(separator.as_str()) {
                cut = cut.min(position);
            }
        }
        title[..cut].trim().to_string()
    }
}

/// Derives the expected key set from a plan: one key per (week, day, menu).
pub fn expected_recipe_keys(plan: &MealPlan, rule: &LabelRule) -> BTreeSet<RecipeKey> {
    let mut expected = BTreeSet::new();
    for week in &plan.weeks {
        for day in &week.days {
            for menu in &day.menus {
                expected.insert(RecipeKey {
                    week: week.week,
                    day: day.day.clone(),
                    menu: menu.menu_name.clone(),
                    dish: rule.primary_label(menu.lunch_main_course()),
                });
            }
        }
    }
    expected
}

/// Derives keys from every recipe object found in the given fragments,
/// duplicates included.
///
/// A fragment may be a `{"recipes": [...]}` document, a bare array, or a
/// single recipe object. Field reads are tolerant: a missing or non-numeric
/// week maps to 0, missing strings map to empty, so a partially-formed
/// entry still yields a (non-matching) key instead of being dropped
/// silently.
pub fn collect_recipe_keys(fragments: &[Value], rule: &LabelRule) -> Vec<RecipeKey> {
    let mut collected = Vec::new();
    for fragment in fragments {
        collect_into(fragment, rule, &mut collected);
    }
    collected
}

fn collect_into(fragment: &Value, rule: &LabelRule, out: &mut Vec<RecipeKey>) {
    match fragment {
        Value::Array(entries) => {
            for entry in entries {
                collect_into(entry, rule, out);
            }
        }
        Value::Object(map) => {
            if let Some(Value::Array(entries)) = map.get("recipes") {
                for entry in entries {
                    collect_into(entry, rule, out);
                }
            } else if let Some(key) = recipe_key_of(fragment, rule) {
                out.push(key);
            }
        }
        _ => {}
    }
}

/// Derives a key from one recipe object; `None` for non-objects.
pub fn recipe_key_of(entry: &Value, rule: &LabelRule) -> Option<RecipeKey> {
    let map = entry.as_object()?;
    Some(RecipeKey {
        week: read_week(map.get("week")),
        day: read_string(map.get("day")),
        menu: read_string(map.get("menu")),
        dish: rule.primary_label(&read_string(map.get("name"))),
    })
}

fn read_week(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0) as u32,
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn read_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mealplan_core::{DayPlan, Lunch, MenuPlan, WeekPlan};
    use serde_json::json;

    fn plan_with_dish(dish: &str) -> MealPlan {
        let mut plan = MealPlan::new(1, vec!["Classic".into()]);
        let mut week = WeekPlan::new(1);
        week.days.push(DayPlan {
            day: "Monday".into(),
            menus: vec![MenuPlan {
                menu_name: "Classic".into(),
                lunch: Some(Lunch {
                    main_course: dish.into(),
                    sides: vec!["Rice".into(), "Peas".into()],
                    ..Lunch::default()
                }),
                ..MenuPlan::default()
            }],
        });
        plan.weeks.push(week);
        plan
    }

    #[test]
    fn test_primary_label_cuts_at_first_separator() {
        let rule = LabelRule::default();
        assert_eq!(rule.primary_label("Goulash with noodles"), "Goulash");
        assert_eq!(rule.primary_label("Baked cod - lemon butter"), "Baked cod");
        assert_eq!(
            rule.primary_label("Stew \u{2013} hearty with dumplings"),
            "Stew"
        );
        assert_eq!(rule.primary_label("Plain soup"), "Plain soup");
    }

    #[test]
    fn test_primary_label_is_configurable() {
        let rule = LabelRule::new(&[" on "]);
        assert_eq!(rule.primary_label("Beans on toast"), "Beans");
        assert_eq!(rule.primary_label("Goulash with noodles"), "Goulash with noodles");
    }

    #[test]
    fn test_expected_keys_use_primary_label() {
        let rule = LabelRule::default();
        let expected = expected_recipe_keys(&plan_with_dish("Goulash with noodles"), &rule);
        assert_eq!(expected.len(), 1);
        assert_eq!(expected.iter().next().unwrap().dish, "Goulash");
    }

    #[test]
    fn test_produced_and_expected_derivation_agree() {
        let rule = LabelRule::default();
        let expected = expected_recipe_keys(&plan_with_dish("Goulash with noodles"), &rule);
        let fragment = json!({"recipes": [{
            "week": 1, "day": "Monday", "menu": "Classic",
            "name": "Goulash with noodles and sour cream",
        }]});
        let produced = collect_recipe_keys(&[fragment], &rule);
        assert_eq!(expected.iter().next(), produced.first());
    }

    #[test]
    fn test_collect_keys_from_bare_array_and_single_object() {
        let rule = LabelRule::default();
        let array = json!([{"week": 1, "day": "Monday", "menu": "Classic", "name": "Stew"}]);
        let object = json!({"week": 2, "day": "Friday", "menu": "Light", "name": "Salad"});
        let keys = collect_recipe_keys(&[array, object], &rule);
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[1].week, 2);
    }

    #[test]
    fn test_tolerant_field_reads() {
        let rule = LabelRule::default();
        let entry = json!({"week": "3", "name": "Curry"});
        let key = recipe_key_of(&entry, &rule).unwrap();
        assert_eq!(key.week, 3);
        assert_eq!(key.day, "");
        let entry = json!({"week": {"nested": true}, "name": "Curry"});
        assert_eq!(recipe_key_of(&entry, &rule).unwrap().week, 0);
    }

    #[test]
    fn test_derivation_is_order_independent() {
        let rule = LabelRule::default();
        let a = json!({"week": 1, "day": "Monday", "menu": "Classic", "name": "Stew"});
        let b = json!({"week": 1, "day": "Tuesday", "menu": "Classic", "name": "Soup"});
        let forward: BTreeSet<_> = collect_recipe_keys(&[a.clone(), b.clone()], &rule)
            .into_iter()
            .collect();
        let backward: BTreeSet<_> = collect_recipe_keys(&[b, a], &rule).into_iter().collect();
        assert_eq!(forward, backward);
    }
}
