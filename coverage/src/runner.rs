//! The per-sub-job retry loop: generate, recover, reconcile, narrow, repeat.
//!
//! Each sub-job owns its expectation, accumulator, and budget; sub-jobs are
//! mutually independent and can run in parallel ([`run_sub_jobs`]). Within a
//! sub-job the loop is strictly sequential, because each follow-up request
//! depends on the previous round's coverage result.

use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use mealplan_core::{recipe_entries, MealPlan, ROOT_KEYS};
use mealplan_recovery::{normalize_root, recover_with_report};

use crate::engine::{coverage_report, CoverageReport};
use crate::followup::followup_plan;
use crate::key::{expected_recipe_keys, LabelRule};
use crate::retry::{RetryBudget, SubJobState};

/// Failure of the external generation transport. Distinct from recovery
/// failures; the coverage engine retries missing items, never transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("generation transport failed: {0}")]
pub struct TransportError(pub String);

/// What a generation call handed back: raw text to be recovered, or a
/// pre-structured payload (e.g. a tool-call argument object) that is
/// already a valid document.
#[derive(Debug, Clone)]
pub enum GeneratorReply {
    Text(String),
    Structured(Value),
}

/// External collaborator producing recipe payloads for a plan-shaped
/// request. Implementations own prompting, transport, and timeouts.
pub trait RecipeGenerator: Sync {
    fn generate(&self, request: &MealPlan) -> Result<GeneratorReply, TransportError>;
}

/// Observable result of one generation round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundReport {
    /// 1-based round number within the sub-job.
    pub round: usize,
    /// Recipe objects accepted from this round's fragment.
    pub produced_entries: usize,
    /// Missing keys remaining after merging this round.
    pub missing_after: usize,
    /// Recovery strategy that produced the fragment, for text replies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    /// Terminal recovery failure for this round, if any. The round still
    /// consumes budget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery_error: Option<String>,
}

/// Terminal result of one sub-job.
#[derive(Debug, Clone, Serialize)]
pub struct SubJobOutcome {
    /// Accepted recipe objects, in acceptance order (append-only).
    pub recipes: Vec<Value>,
    pub report: CoverageReport,
    pub state: SubJobState,
    pub rounds: Vec<RoundReport>,
    pub budget: RetryBudget,
}

/// Drives one sub-job to a terminal state.
///
/// Each round issues a generation call for the current request, recovers
/// and normalizes the reply, merges accepted recipe objects into the
/// accumulator, and recomputes the missing set. A non-empty missing set
/// with budget left narrows the next request to exactly the missing items.
/// Recovery failures are recorded in the round log and consume budget;
/// transport errors propagate immediately.
pub fn run_sub_job<G: RecipeGenerator + ?Sized>(
    generator: &G,
    plan: &MealPlan,
    rule: &LabelRule,
    mut budget: RetryBudget,
) -> Result<SubJobOutcome, TransportError> {
    let expected = expected_recipe_keys(plan, rule);
    let mut accumulator: Vec<Value> = Vec::new();
    let mut rounds: Vec<RoundReport> = Vec::new();
    let mut request = plan.clone();
    let mut report = coverage_report(expected.clone(), &accumulator, rule);

    while !report.is_complete() && !budget.exhausted() {
        let round = budget.attempts_made + 1;
        let reply = generator.generate(&request)?;
        budget.record_attempt();

        let (fragment, strategy, recovery_error) = match reply {
            GeneratorReply::Structured(value) => {
                (Some(normalize_root(value, &ROOT_KEYS)), None, None)
            }
            GeneratorReply::Text(text) => {
                let run = recover_with_report(&text);
                let strategy = run.report.succeeded_with.clone();
                match run.result {
                    Ok(value) => (Some(normalize_root(value, &ROOT_KEYS)), strategy, None),
                    Err(err) => (None, strategy, Some(err.to_string())),
                }
            }
        };

        let produced_entries = match &fragment {
            Some(value) => {
                let entries = recipe_entries(value);
                let count = entries.len();
                accumulator.extend(entries);
                count
            }
            None => 0,
        };

        report = coverage_report(expected.clone(), &accumulator, rule);
        debug!(
            round,
            produced_entries,
            missing = report.missing.len(),
            "sub-job round evaluated"
        );
        rounds.push(RoundReport {
            round,
            produced_entries,
            missing_after: report.missing.len(),
            strategy,
            recovery_error,
        });

        if !report.is_complete() && !budget.exhausted() {
            request = followup_plan(plan, &report.missing, rule);
        }
    }

    let state = if report.is_complete() {
        SubJobState::Complete
    } else {
        warn!(
            missing = report.missing.len(),
            attempts = budget.attempts_made,
            "sub-job budget exhausted with items missing"
        );
        SubJobState::PartialFailure
    };

    Ok(SubJobOutcome {
        recipes: accumulator,
        report,
        state,
        rounds,
        budget,
    })
}

/// Runs mutually-independent sub-jobs in parallel.
///
/// Results are returned in input order; each sub-job gets a fresh budget.
pub fn run_sub_jobs<G: RecipeGenerator>(
    generator: &G,
    plans: &[MealPlan],
    rule: &LabelRule,
    max_attempts: usize,
) -> Vec<Result<SubJobOutcome, TransportError>> {
    plans
        .par_iter()
        .map(|plan| run_sub_job(generator, plan, rule, RetryBudget::new(max_attempts)))
        .collect()
}
