//! Parallel rendering of independent battle reports.
//!
//! Composers keep no state between calls, so each job renders on its own and
//! results come back in input order.

use rayon::prelude::*;
use serde::Deserialize;

use crate::data::battle::{BattleRecord, FleetLossRecord};
use crate::parallel::pool::WorkerPool;
use crate::report::compose::{render_report, FormattedReport, ReportFormat};
use crate::report::error::Result;

/// Everything needed to render one report.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderJob {
    pub record: BattleRecord,
    #[serde(default)]
    pub losses: Option<Vec<FleetLossRecord>>,
    pub report_url: String,
    pub user: String,
    #[serde(default)]
    pub format: ReportFormat,
}

impl RenderJob {
    pub fn render(&self) -> Result<FormattedReport> {
        render_report(
            self.format,
            &self.record,
            self.losses.as_deref(),
            &self.report_url,
            &self.user,
        )
    }
}

/// Render every job on `pool`; one result per job, in order.
pub fn render_batch(jobs: &[RenderJob], pool: &WorkerPool) -> Vec<Result<FormattedReport>> {
    tracing::debug!(jobs = jobs.len(), workers = pool.workers, "rendering batch");
    pool.install(|| jobs.par_iter().map(RenderJob::render).collect())
}
