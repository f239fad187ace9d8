use serde::Serialize;

use crate::model::metrics::MetricReport;
use crate::model::partition::Partition;
use crate::model::profile::EvalProfile;
use crate::pipeline::stage1_load::LoadStats;
use crate::pipeline::stage2_split::SplitStats;

pub const TOOL_NAME: &str = "hamspam-eval";

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary<'a> {
    pub tool: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<&'a EvalProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<DataSummary<'a>>,
    pub results: Vec<ScoreEntry<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataSummary<'a> {
    pub load: &'a LoadStats,
    pub split: &'a SplitStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreEntry<'a> {
    pub model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<Partition>,
    pub n_samples: u64,
    pub metrics: &'a MetricReport,
}

impl<'a> ScoreEntry<'a> {
    pub fn new(model: &'a str, partition: Option<Partition>, metrics: &'a MetricReport) -> Self {
        Self {
            model,
            partition,
            n_samples: metrics.n_samples(),
            metrics,
        }
    }
}

pub fn render_summary_json(summary: &RunSummary<'_>) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(summary)?;
    out.push('\n');
    Ok(out)
}
