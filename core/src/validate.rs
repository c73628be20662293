//! Structural validation of plan documents.
//!
//! Validates the invariants a generated plan must satisfy before it is
//! accepted into the growing document: known weekdays, the configured number
//! of menu lines per day, a main course and enough sides at lunch, and
//! exactly seven days per week. Errors are accumulated, not short-circuited,
//! so one report covers everything wrong with a fragment.
//!
//! # Examples
//!
//! ```
//! use mealplan_core::*;
//!
//! let day = DayPlan {
//!     day: "Monday".into(),
//!     menus: vec![MenuPlan {
//!         menu_name: "Classic".into(),
//!         breakfast: Some(Meal::default()),
//!         lunch: Some(Lunch {
//!             main_course: "Baked cod".into(),
//!             sides: vec!["Rice".into(), "Peas".into()],
//!             ..Lunch::default()
//!         }),
//!         snack: None,
//!         dinner: Some(Meal::default()),
//!     }],
//! };
//! assert!(validate_day(&day, 1).is_empty());
//! ```

use thiserror::Error;

use crate::{DayPlan, MealPlan, WeekPlan, WEEKDAYS};

/// Structural problems found in a plan fragment.
///
/// Each variant names a specific violated invariant. The `Display` impl
/// provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Day name is not one of the seven known weekdays.
    #[error("unknown weekday: {0:?}")]
    UnknownWeekday(String),
    /// Day carries no menu entries at all.
    #[error("day {0}: no menus")]
    NoMenus(String),
    /// Day carries a different number of menus than configured lines.
    #[error("day {day}: expected {expected} menus, found {found}")]
    MenuCountMismatch {
        day: String,
        expected: usize,
        found: usize,
    },
    /// Menu entry is missing its menu-line name.
    #[error("day {day}, menu {index}: missing menu name")]
    MissingMenuName { day: String, index: usize },
    /// Menu entry is missing a required meal slot.
    #[error("day {day}, menu {menu}: missing {meal}")]
    MissingMeal {
        day: String,
        menu: String,
        meal: &'static str,
    },
    /// Lunch has no main course.
    #[error("day {day}, menu {menu}: lunch has no main course")]
    MissingMainCourse { day: String, menu: String },
    /// Lunch offers fewer than two sides.
    #[error("day {day}, menu {menu}: lunch has {found} sides, need at least 2")]
    TooFewSides {
        day: String,
        menu: String,
        found: usize,
    },
    /// Week does not cover exactly seven days.
    #[error("week {week}: expected 7 days, found {found}")]
    WrongDayCount { week: u32, found: usize },
}

/// Validates one day against the configured number of menu lines.
pub fn validate_day(day: &DayPlan, menu_lines: usize) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !WEEKDAYS.contains(&day.day.as_str()) {
        errors.push(ValidationError::UnknownWeekday(day.day.clone()));
    }

    if day.menus.is_empty() {
        errors.push(ValidationError::NoMenus(day.day.clone()));
        return errors;
    }

    if day.menus.len() != menu_lines {
        errors.push(ValidationError::MenuCountMismatch {
            day: day.day.clone(),
            expected: menu_lines,
            found: day.menus.len(),
        });
    }

    for (index, menu) in day.menus.iter().enumerate() {
        let menu_label = if menu.menu_name.is_empty() {
            errors.push(ValidationError::MissingMenuName {
                day: day.day.clone(),
                index: index + 1,
            });
            format!("#{}", index + 1)
        } else {
            menu.menu_name.clone()
        };

        if menu.breakfast.is_none() {
            errors.push(ValidationError::MissingMeal {
                day: day.day.clone(),
                menu: menu_label.clone(),
                meal: "breakfast",
            });
        }
        if menu.dinner.is_none() {
            errors.push(ValidationError::MissingMeal {
                day: day.day.clone(),
                menu: menu_label.clone(),
                meal: "dinner",
            });
        }

        match &menu.lunch {
            None => errors.push(ValidationError::MissingMeal {
                day: day.day.clone(),
                menu: menu_label.clone(),
                meal: "lunch",
            }),
            Some(lunch) => {
                if lunch.main_course.trim().is_empty() {
                    errors.push(ValidationError::MissingMainCourse {
                        day: day.day.clone(),
                        menu: menu_label.clone(),
                    });
                }
                if lunch.sides.len() < 2 {
                    errors.push(ValidationError::TooFewSides {
                        day: day.day.clone(),
                        menu: menu_label.clone(),
                        found: lunch.sides.len(),
                    });
                }
            }
        }
    }

    errors
}

/// Validates one week: exactly seven days, each individually valid.
pub fn validate_week(week: &WeekPlan, menu_lines: usize) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if week.days.len() != 7 {
        errors.push(ValidationError::WrongDayCount {
            week: week.week,
            found: week.days.len(),
        });
        return errors;
    }

    for day in &week.days {
        errors.extend(validate_day(day, menu_lines));
    }

    errors
}

/// Validates a full plan against its own menu-line configuration.
pub fn validate_plan(plan: &MealPlan) -> Vec<ValidationError> {
    plan.weeks
        .iter()
        .flat_map(|week| validate_week(week, plan.menu_lines))
        .collect()
}
