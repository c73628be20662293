//! Coverage reconciliation and bounded-retry generation for chunked jobs.
//!
//! A caller wanting a large nested document from a size-limited generator
//! splits it into sub-jobs. This crate tracks which logical items each
//! sub-job was supposed to produce, detects what is missing after each
//! round, synthesizes a narrower follow-up request for exactly the missing
//! items, and bounds retries — missing items end as an explicit partial
//! failure, never a silent drop.
//!
//! # Main entry points
//!
//! - [`expected_recipe_keys`] / [`coverage_report`] — derive and reconcile
//!   item-key sets.
//! - [`followup_plan`] — build the narrowed follow-up request.
//! - [`run_sub_job`] / [`run_sub_jobs`] — drive sub-jobs to a terminal
//!   state against a [`RecipeGenerator`].
//! - [`generate_plan`] — the full staged multi-week pipeline.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeSet;
//! use mealplan_coverage::{compute_missing, RecipeKey};
//!
//! let key = |dish: &str| RecipeKey {
//!     week: 1,
//!     day: "Monday".into(),
//!     menu: "Classic".into(),
//!     dish: dish.into(),
//! };
//! let expected: BTreeSet<_> = [key("Stew"), key("Soup")].into_iter().collect();
//! let produced: BTreeSet<_> = [key("Stew")].into_iter().collect();
//!
//! let missing = compute_missing(&expected, &produced);
//! assert_eq!(missing, [key("Soup")].into_iter().collect());
//! ```

mod engine;
mod followup;
mod key;
mod pipeline;
mod report;
mod retry;
mod runner;

pub use engine::{compute_missing, coverage_report, CoverageReport};
pub use followup::followup_plan;
pub use key::{collect_recipe_keys, expected_recipe_keys, recipe_key_of, LabelRule, RecipeKey};
pub use pipeline::{
    generate_plan, generate_week, DayPlanGenerator, PipelineError, StagedConfig, StagedOutcome,
};
pub use report::{RunReportBundle, SubJobReport};
pub use retry::{RetryBudget, SubJobState};
pub use runner::{
    run_sub_job, run_sub_jobs, GeneratorReply, RecipeGenerator, RoundReport, SubJobOutcome,
    TransportError,
};
