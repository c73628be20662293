//! Staged multi-week generation.
//!
//! A whole plan is too large for one generation call, so the pipeline
//! splits the work: each week is generated day by day, then recipes are
//! covered in contiguous day groups, each group a coverage sub-job with its
//! own retry budget. Accepted fragments merge append-only into the growing
//! document; a group that ends in partial failure is reported and leaves
//! its siblings untouched.

use chrono::Utc;
use rayon::prelude::*;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use mealplan_core::{
    append_week, validate_day, validate_week, DayPlan, MealPlan, ValidationError, WeekPlan,
    ROOT_KEYS, WEEKDAYS,
};
use mealplan_recovery::{normalize_root, recover, RecoveryError};

use crate::key::LabelRule;
use crate::report::{RunReportBundle, SubJobReport};
use crate::retry::{RetryBudget, SubJobState};
use crate::runner::{run_sub_job, GeneratorReply, RecipeGenerator, TransportError};

/// External collaborator producing one day's plan payload.
pub trait DayPlanGenerator: Sync {
    fn generate_day(
        &self,
        day: &str,
        menu_lines: usize,
        menu_names: &[String],
    ) -> Result<GeneratorReply, TransportError>;
}

/// Configuration for one staged run.
#[derive(Debug, Clone)]
pub struct StagedConfig {
    pub weeks: u32,
    pub menu_lines: usize,
    pub menu_names: Vec<String>,
    /// Days covered per recipe sub-job.
    pub days_per_group: usize,
    /// Total generation rounds allowed per recipe sub-job.
    pub max_attempts: usize,
}

impl StagedConfig {
    pub fn new(weeks: u32, menu_lines: usize, menu_names: Vec<String>) -> Self {
        Self {
            weeks,
            menu_lines,
            menu_names,
            days_per_group: 2,
            max_attempts: 3,
        }
    }
}

/// Failure of a staged run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("transport failure for {context}: {source}")]
    Transport {
        context: String,
        source: TransportError,
    },
    #[error("could not recover a document for {context}: {source}")]
    Recovery {
        context: String,
        source: RecoveryError,
    },
    #[error("unexpected day payload for {context}: {reason}")]
    MalformedDay { context: String, reason: String },
    #[error("structural validation failed for {context}: {}", join_errors(.errors))]
    InvalidStructure {
        context: String,
        errors: Vec<ValidationError>,
    },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result of a staged run: the assembled plan, every accepted recipe
/// object, and the per-sub-job report bundle.
#[derive(Debug)]
pub struct StagedOutcome {
    pub plan: MealPlan,
    pub recipes: Vec<Value>,
    pub report: RunReportBundle,
}

/// Generates one week day by day.
///
/// Each day call is recovered, normalized, structurally repaired (menus
/// truncated or padded to the configured line count), and validated. A
/// transport-failed day call is retried once before failing the week.
pub fn generate_week<P: DayPlanGenerator + ?Sized>(
    generator: &P,
    week_number: u32,
    config: &StagedConfig,
) -> Result<WeekPlan, PipelineError> {
    let mut week = WeekPlan::new(week_number);
    for day_name in WEEKDAYS {
        let day = generate_day_plan(generator, week_number, day_name, config)?;
        week.days.push(day);
    }

    let errors = validate_week(&week, config.menu_lines);
    if !errors.is_empty() {
        return Err(PipelineError::InvalidStructure {
            context: format!("week {week_number}"),
            errors,
        });
    }
    Ok(week)
}

fn generate_day_plan<P: DayPlanGenerator + ?Sized>(
    generator: &P,
    week_number: u32,
    day_name: &str,
    config: &StagedConfig,
) -> Result<DayPlan, PipelineError> {
    let context = format!("week {week_number}, {day_name}");

    let reply = match generator.generate_day(day_name, config.menu_lines, &config.menu_names) {
        Ok(reply) => reply,
        Err(first_error) => {
            warn!(%context, error = %first_error, "day generation failed, retrying once");
            generator
                .generate_day(day_name, config.menu_lines, &config.menu_names)
                .map_err(|source| PipelineError::Transport {
                    context: context.clone(),
                    source,
                })?
        }
    };

    let value = match reply {
        GeneratorReply::Structured(value) => value,
        GeneratorReply::Text(text) => {
            recover(&text).map_err(|source| PipelineError::Recovery {
                context: context.clone(),
                source,
            })?
        }
    };
    let value = normalize_root(value, &ROOT_KEYS);

    let mut day: DayPlan =
        serde_json::from_value(value).map_err(|err| PipelineError::MalformedDay {
            context: context.clone(),
            reason: err.to_string(),
        })?;
    if day.day.is_empty() || day.menus.is_empty() {
        return Err(PipelineError::MalformedDay {
            context,
            reason: "payload has no day name or no menus".to_string(),
        });
    }

    enforce_menu_count(&mut day, config.menu_lines);

    let errors = validate_day(&day, config.menu_lines);
    if !errors.is_empty() {
        return Err(PipelineError::InvalidStructure { context, errors });
    }
    Ok(day)
}

/// Truncates over-produced menus and pads under-produced ones by repeating
/// the last entry, so a day always carries the configured line count.
fn enforce_menu_count(day: &mut DayPlan, menu_lines: usize) {
    if day.menus.len() > menu_lines {
        day.menus.truncate(menu_lines);
    } else if !day.menus.is_empty() {
        while day.menus.len() < menu_lines {
            let last = day.menus[day.menus.len() - 1].clone();
            day.menus.push(last);
        }
    }
}

/// Runs the full staged pipeline: plan weeks day-wise, then cover recipes
/// per day group, in parallel across a week's independent groups.
pub fn generate_plan<P, G>(
    plan_generator: &P,
    recipe_generator: &G,
    config: &StagedConfig,
) -> Result<StagedOutcome, PipelineError>
where
    P: DayPlanGenerator + ?Sized,
    G: RecipeGenerator + ?Sized,
{
    let rule = LabelRule::default();
    let mut plan = MealPlan::new(config.menu_lines, config.menu_names.clone());
    let mut recipes: Vec<Value> = Vec::new();
    let mut sub_jobs: Vec<SubJobReport> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    for week_number in 1..=config.weeks {
        let week = generate_week(plan_generator, week_number, config)?;

        let group_plans = day_group_plans(&week, config);
        debug!(
            week = week_number,
            groups = group_plans.len(),
            "covering recipes per day group"
        );

        // Groups of one week are mutually independent; only the appends
        // below need to stay sequential.
        let outcomes: Vec<_> = group_plans
            .par_iter()
            .map(|group_plan| {
                run_sub_job(
                    recipe_generator,
                    group_plan,
                    &rule,
                    RetryBudget::new(config.max_attempts),
                )
            })
            .collect();

        for (index, outcome) in outcomes.into_iter().enumerate() {
            let group = index + 1;
            let outcome = outcome.map_err(|source| PipelineError::Transport {
                context: format!("week {week_number}, group {group}"),
                source,
            })?;

            if outcome.state == SubJobState::PartialFailure {
                warnings.push(format!(
                    "week {week_number}, group {group}: {} recipe(s) still missing after {} round(s)",
                    outcome.report.missing.len(),
                    outcome.rounds.len(),
                ));
            }
            sub_jobs.push(SubJobReport {
                week: week_number,
                group,
                state: outcome.state,
                expected: outcome.report.expected.len(),
                produced: outcome.report.produced.len(),
                missing: outcome.report.missing.iter().cloned().collect(),
                rounds: outcome.rounds.len(),
            });
            recipes.extend(outcome.recipes);
        }

        append_week(&mut plan, week);
    }

    Ok(StagedOutcome {
        plan,
        recipes,
        report: RunReportBundle {
            generated_at: Utc::now().to_rfc3339(),
            weeks: config.weeks,
            sub_jobs,
            warnings,
        },
    })
}

/// Slices a week into contiguous day-group sub-job plans, preserving the
/// week number and menu configuration each group needs for regeneration.
fn day_group_plans(week: &WeekPlan, config: &StagedConfig) -> Vec<MealPlan> {
    let group_size = config.days_per_group.max(1);
    week.days
        .chunks(group_size)
        .map(|days| {
            let mut group_plan = MealPlan::new(config.menu_lines, config.menu_names.clone());
            group_plan.weeks.push(WeekPlan {
                week: week.week,
                days: days.to_vec(),
            });
            group_plan
        })
        .collect()
}
