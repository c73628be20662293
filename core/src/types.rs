//! Wire-format type definitions for generated meal-plan documents.

use serde::{Deserialize, Serialize};

/// Weekday names in plan order. A valid week covers each exactly once.
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Logical root keys a generator payload may carry. Used by the envelope
/// normalizer to locate the expected payload inside wrapper objects.
pub const ROOT_KEYS: [&str; 3] = ["plan", "recipes", "day"];

/// Top-level plan document as it appears on the wire: `{"plan": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDocument {
    pub plan: MealPlan,
}

/// A multi-week meal plan with its menu-line configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MealPlan {
    /// Week entries, one per generated week.
    #[serde(default)]
    pub weeks: Vec<WeekPlan>,
    /// Number of parallel menu lines each day must offer.
    #[serde(default)]
    pub menu_lines: usize,
    /// Display names of the menu lines, in line order.
    #[serde(default)]
    pub menu_names: Vec<String>,
}

impl MealPlan {
    /// Creates an empty plan for the given menu-line configuration.
    pub fn new(menu_lines: usize, menu_names: Vec<String>) -> Self {
        Self {
            weeks: Vec::new(),
            menu_lines,
            menu_names,
        }
    }

    /// Finds a week by number.
    pub fn week(&self, number: u32) -> Option<&WeekPlan> {
        self.weeks.iter().find(|w| w.week == number)
    }

    /// Total number of menu entries across all weeks and days.
    pub fn menu_count(&self) -> usize {
        self.weeks
            .iter()
            .flat_map(|w| &w.days)
            .map(|d| d.menus.len())
            .sum()
    }
}

/// One week of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPlan {
    /// 1-based week number within the overall plan.
    #[serde(default = "default_week")]
    pub week: u32,
    #[serde(default)]
    pub days: Vec<DayPlan>,
}

fn default_week() -> u32 {
    1
}

impl WeekPlan {
    pub fn new(week: u32) -> Self {
        Self {
            week,
            days: Vec::new(),
        }
    }

    /// Finds a day by weekday name.
    pub fn day(&self, name: &str) -> Option<&DayPlan> {
        self.days.iter().find(|d| d.day == name)
    }
}

/// One day of a plan, carrying one menu entry per menu line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DayPlan {
    /// Weekday name, one of [`WEEKDAYS`].
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub menus: Vec<MenuPlan>,
}

impl DayPlan {
    /// Finds a menu entry by menu-line name.
    pub fn menu(&self, name: &str) -> Option<&MenuPlan> {
        self.menus.iter().find(|m| m.menu_name == name)
    }
}

/// One menu line's meals for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MenuPlan {
    #[serde(default)]
    pub menu_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakfast: Option<Meal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lunch: Option<Lunch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dinner: Option<Meal>,
}

impl MenuPlan {
    /// The lunch main course, or an empty string when absent.
    ///
    /// Coverage keys are derived from this field, so absence maps to an
    /// empty label rather than an error.
    pub fn lunch_main_course(&self) -> &str {
        self.lunch.as_ref().map_or("", |l| l.main_course.as_str())
    }
}

/// A simple meal (breakfast/dinner): main course, sides, beverage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Meal {
    #[serde(default)]
    pub main_course: String,
    #[serde(default)]
    pub sides: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beverage: Option<String>,
}

/// The lunch course, the richest meal of the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Lunch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starter: Option<String>,
    #[serde(default)]
    pub main_course: String,
    #[serde(default)]
    pub sides: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dessert: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<Nutrition>,
    #[serde(default)]
    pub allergens: Vec<String>,
}

/// Declared nutrition values. Free-text on the wire ("ca. 650 kcal").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Nutrition {
    #[serde(default)]
    pub calories: String,
    #[serde(default)]
    pub protein: String,
}

/// One generated recipe, addressed by (week, day, menu, name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Recipe {
    #[serde(default)]
    pub week: u32,
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub menu: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
}

/// Recipe document as it appears on the wire: `{"recipes": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RecipeSet {
    #[serde(default)]
    pub recipes: Vec<Recipe>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_document_roundtrip() {
        let mut plan = MealPlan::new(2, vec!["Classic".into(), "Vegetarian".into()]);
        let mut week = WeekPlan::new(1);
        week.days.push(DayPlan {
            day: "Monday".into(),
            menus: vec![MenuPlan {
                menu_name: "Classic".into(),
                lunch: Some(Lunch {
                    main_course: "Roast chicken".into(),
                    sides: vec!["Potatoes".into(), "Beans".into()],
                    ..Lunch::default()
                }),
                ..MenuPlan::default()
            }],
        });
        plan.weeks.push(week);

        let json = serde_json::to_string(&PlanDocument { plan: plan.clone() }).unwrap();
        let back: PlanDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back.plan, plan);
        assert_eq!(
            back.plan.week(1).unwrap().day("Monday").unwrap().menus.len(),
            1
        );
    }

    #[test]
    fn test_recipe_tolerates_missing_fields() {
        let recipe: Recipe = serde_json::from_str(r#"{"name": "Lentil soup"}"#).unwrap();
        assert_eq!(recipe.week, 0);
        assert_eq!(recipe.name, "Lentil soup");
        assert!(recipe.ingredients.is_empty());
    }

    #[test]
    fn test_lunch_main_course_defaults_to_empty() {
        let menu = MenuPlan::default();
        assert_eq!(menu.lunch_main_course(), "");
    }
}
