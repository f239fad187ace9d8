use std::fs;
use std::io::Write;
use std::path::Path;

use crate::model::profile::EvalProfile;
use crate::pipeline::PipelineError;
use crate::pipeline::stage1_load::LoadStats;
use crate::pipeline::stage2_split::SplitStats;
use crate::pipeline::stage4_score::ScoredPair;
use crate::report::ReportFormat;
use crate::report::json::{DataSummary, RunSummary, ScoreEntry, TOOL_NAME, render_summary_json};
use crate::report::text::{block_title, render_score_block};

#[derive(Debug, Clone)]
pub struct Stage5Input<'a> {
    pub profile: Option<&'a EvalProfile>,
    pub load: Option<&'a LoadStats>,
    pub split: Option<&'a SplitStats>,
    pub scored: &'a [ScoredPair],
    pub version: &'static str,
}

pub fn render_text(input: &Stage5Input<'_>) -> String {
    let mut out = String::new();
    for pair in input.scored {
        let title = block_title(&pair.model, pair.partition.title());
        out.push_str(&render_score_block(&title, &pair.report));
    }
    out
}

pub fn render_json(input: &Stage5Input<'_>) -> Result<String, serde_json::Error> {
    let data = match (input.load, input.split) {
        (Some(load), Some(split)) => Some(DataSummary { load, split }),
        _ => None,
    };
    let summary = RunSummary {
        tool: TOOL_NAME,
        version: input.version,
        config: input.profile,
        data,
        results: input
            .scored
            .iter()
            .map(|p| ScoreEntry::new(&p.model, Some(p.partition), &p.report))
            .collect(),
    };
    render_summary_json(&summary)
}

/// Writes the chosen format to `stdout` and, when `out_dir` is set, both formats to
/// `report.txt` and `summary.json` inside it.
pub fn write_reports(
    input: &Stage5Input<'_>,
    format: ReportFormat,
    out_dir: Option<&Path>,
    stdout: &mut dyn Write,
) -> Result<(), PipelineError> {
    let text = render_text(input);
    let json = render_json(input)?;

    let shown = match format {
        ReportFormat::Text => &text,
        ReportFormat::Json => &json,
    };
    stdout
        .write_all(shown.as_bytes())
        .map_err(|source| PipelineError::Write {
            path: "<stdout>".into(),
            source,
        })?;

    if let Some(dir) = out_dir {
        fs::create_dir_all(dir).map_err(|source| PipelineError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
        write_text(&dir.join("report.txt"), &text)?;
        write_text(&dir.join("summary.json"), &json)?;
        tracing::info!(dir = %dir.display(), "reports written");
    }
    Ok(())
}

fn write_text(path: &Path, contents: &str) -> Result<(), PipelineError> {
    fs::write(path, contents).map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_report.rs"]
mod tests;
