//! Core wire-format types and document assembly primitives.
//!
//! This crate defines the foundational types for the meal-plan generation
//! pipeline:
//!
//! - [`MealPlan`] / [`WeekPlan`] / [`DayPlan`] / [`MenuPlan`] — the nested
//!   plan document a generator is asked to produce.
//! - [`Recipe`] / [`RecipeSet`] — the recipe payloads reconciled against the
//!   plan by the coverage engine.
//! - [`ROOT_KEYS`] — the logical root keys used to locate a payload inside
//!   wrapper envelopes.
//!
//! Validation ([`validate_day`], [`validate_week`], [`validate_plan`])
//! catches structural errors such as unknown weekdays, menu-count
//! mismatches, and incomplete lunches.
//!
//! Merging ([`append_week`], [`extend_recipes`]) assembles accepted
//! fragments into the growing document append-only.
//!
//! # Example
//!
//! ```
//! use mealplan_core::*;
//!
//! let mut plan = MealPlan::new(1, vec!["Classic".into()]);
//! let mut week = WeekPlan::new(1);
//! for name in WEEKDAYS {
//!     week.days.push(DayPlan {
//!         day: name.to_string(),
//!         menus: vec![MenuPlan {
//!             menu_name: "Classic".into(),
//!             breakfast: Some(Meal::default()),
//!             lunch: Some(Lunch {
//!                 main_course: "Baked cod".into(),
//!                 sides: vec!["Rice".into(), "Peas".into()],
//!                 ..Lunch::default()
//!             }),
//!             snack: None,
//!             dinner: Some(Meal::default()),
//!         }],
//!     });
//! }
//! append_week(&mut plan, week);
//! assert!(validate_plan(&plan).is_empty());
//! ```

mod merge;
mod types;
mod validate;

pub use merge::{append_week, extend_recipes, recipe_entries};
pub use types::*;
pub use validate::{validate_day, validate_plan, validate_week, ValidationError};
