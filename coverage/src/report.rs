//! Structured reporting for staged generation runs.

use serde::Serialize;

use crate::key::RecipeKey;
use crate::retry::SubJobState;

/// Summary of one recipe sub-job (one contiguous day group of one week).
#[derive(Debug, Clone, Serialize)]
pub struct SubJobReport {
    pub week: u32,
    /// 1-based group index within the week.
    pub group: usize,
    pub state: SubJobState,
    pub expected: usize,
    pub produced: usize,
    /// Keys still missing at the terminal state; empty for complete jobs.
    pub missing: Vec<RecipeKey>,
    /// Generation rounds spent.
    pub rounds: usize,
}

/// Batch report for a full staged generation run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReportBundle {
    pub generated_at: String,
    pub weeks: u32,
    pub sub_jobs: Vec<SubJobReport>,
    pub warnings: Vec<String>,
}

impl RunReportBundle {
    /// Whether every sub-job reached `Complete`.
    pub fn all_complete(&self) -> bool {
        self.sub_jobs
            .iter()
            .all(|job| job.state == SubJobState::Complete)
    }
}
