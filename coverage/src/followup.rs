//! Follow-up request synthesis for missing items.
//!
//! A follow-up request is the original plan filtered down to exactly the
//! days and menus owning missing dishes. Contextual fields (`week` numbers,
//! `menu_lines`, `menu_names`) are preserved so regeneration reproduces
//! compatible identities rather than fresh ones that would re-diverge from
//! the expectation.

use std::collections::{BTreeSet, HashMap, HashSet};

use mealplan_core::{DayPlan, MealPlan, WeekPlan};

use crate::key::{LabelRule, RecipeKey};

/// Builds a plan scoped to exactly the missing keys.
pub fn followup_plan(
    plan: &MealPlan,
    missing: &BTreeSet<RecipeKey>,
    rule: &LabelRule,
) -> MealPlan {
    type Needed<'a> = (HashSet<&'a str>, HashSet<&'a str>);
    let mut needed: HashMap<(u32, &str), Needed<'_>> = HashMap::new();
    for key in missing {
        let entry = needed.entry((key.week, key.day.as_str())).or_default();
        entry.0.insert(key.dish.as_str());
        entry.1.insert(key.menu.as_str());
    }

    let mut reduced = MealPlan::new(plan.menu_lines, plan.menu_names.clone());
    for week in &plan.weeks {
        let mut days = Vec::new();
        for day in &week.days {
            let Some((dishes, menus)) = needed.get(&(week.week, day.day.as_str())) else {
                continue;
            };
            let kept: Vec<_> = day
                .menus
                .iter()
                .filter(|menu| {
                    menus.contains(menu.menu_name.as_str())
                        && dishes.contains(rule.primary_label(menu.lunch_main_course()).as_str())
                })
                .cloned()
                .collect();
            if !kept.is_empty() {
                days.push(DayPlan {
                    day: day.day.clone(),
                    menus: kept,
                });
            }
        }
        if !days.is_empty() {
            reduced.weeks.push(WeekPlan {
                week: week.week,
                days,
            });
        }
    }
    reduced
}
