//! Set-difference reconciliation of expected versus produced recipes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::key::{collect_recipe_keys, LabelRule, RecipeKey};

/// What a sub-job was asked for, what it produced, and what is still owed.
///
/// Recomputed after every generation round; `missing` drives the next
/// follow-up request or the terminal partial-failure report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CoverageReport {
    pub expected: BTreeSet<RecipeKey>,
    pub produced: BTreeSet<RecipeKey>,
    pub missing: BTreeSet<RecipeKey>,
    /// Number of produced keys seen more than once. Duplicates are ignored
    /// for coverage purposes, never errors.
    pub duplicates: usize,
}

impl CoverageReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Fraction of expected items covered, in [0.0, 1.0].
    pub fn ratio(&self) -> f64 {
        if self.expected.is_empty() {
            return 1.0;
        }
        let covered = self.expected.len() - self.missing.len();
        covered as f64 / self.expected.len() as f64
    }
}

/// Pure set difference: `expected − produced`.
///
/// Ordering differences between the two sides never register as missing
/// items.
pub fn compute_missing(
    expected: &BTreeSet<RecipeKey>,
    produced: &BTreeSet<RecipeKey>,
) -> BTreeSet<RecipeKey> {
    expected.difference(produced).cloned().collect()
}

/// Builds a coverage report for the given expectation against every recipe
/// found in `fragments`.
pub fn coverage_report(
    expected: BTreeSet<RecipeKey>,
    fragments: &[Value],
    rule: &LabelRule,
) -> CoverageReport {
    let mut produced = BTreeSet::new();
    let mut duplicates = 0;
    for key in collect_recipe_keys(fragments, rule) {
        if !produced.insert(key) {
            duplicates += 1;
        }
    }
    let missing = compute_missing(&expected, &produced);
    CoverageReport {
        expected,
        produced,
        missing,
        duplicates,
    }
}
