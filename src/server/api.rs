use serde::Serialize;

use crate::parallel::{render_batch, RenderJob, WorkerPool};
use crate::report::{FormattedReport, ReportError, Result};

/// Error payload shared by failed requests and failed batch items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    status: &'static str,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}

/// One entry of a batch response: the rendered report or why it failed.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum BatchItem {
    Rendered(FormattedReport),
    Failed(ErrorBody),
}

impl From<Result<FormattedReport>> for BatchItem {
    fn from(result: Result<FormattedReport>) -> Self {
        match result {
            Ok(report) => Self::Rendered(report),
            Err(err) => Self::Failed(ErrorBody::new(err.to_string())),
        }
    }
}

pub fn health_payload() -> Result<String> {
    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "battle-report-api",
        "version": env!("CARGO_PKG_VERSION")
    }))?)
}

/// POST /api/report: one [RenderJob] in, one formatted report out.
pub fn report_payload(body: &str) -> Result<String> {
    let job: RenderJob = serde_json::from_str(body)?;
    let report = job.render()?;
    Ok(serde_json::to_string_pretty(&report)?)
}

/// POST /api/report/batch: array of jobs; failures are reported per item.
pub fn batch_payload(body: &str) -> Result<String> {
    let jobs: Vec<RenderJob> = serde_json::from_str(body)?;
    let items: Vec<BatchItem> = render_batch(&jobs, &WorkerPool::default_workers())
        .into_iter()
        .map(BatchItem::from)
        .collect();
    serde_json::to_string_pretty(&items).map_err(ReportError::from)
}
