use crate::model::metrics::MetricReport;
use crate::model::partition::Partition;
use crate::pipeline::stage2_split::SplitData;
use crate::pipeline::stage3_fit::ModelPredictions;
use crate::scoring::{ScoreError, score};

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPair {
    pub model: String,
    pub partition: Partition,
    pub report: MetricReport,
}

/// Scores every (model, partition) pair, train before test for each model.
pub fn run_stage4(
    split: &SplitData,
    predictions: &[ModelPredictions],
) -> Result<Vec<ScoredPair>, ScoreError> {
    let mut out = Vec::with_capacity(predictions.len() * 2);
    for preds in predictions {
        for partition in Partition::all() {
            let truth = match partition {
                Partition::Train => split.train.labels.to_vec(),
                Partition::Test => split.test.labels.to_vec(),
            };
            let report = score(&truth, preds.for_partition(partition))?;
            log_report(preds.model, partition, &report);
            out.push(ScoredPair {
                model: preds.model.to_string(),
                partition,
                report,
            });
        }
    }
    Ok(out)
}

/// One `info` event per pair, then one `debug` event per metric in report order.
pub fn log_report(model: &str, partition: Partition, r: &MetricReport) {
    let partition = partition.title();
    tracing::info!(
        model,
        partition,
        samples = r.n_samples(),
        accuracy = r.accuracy,
        tn = r.confusion.tn,
        fp = r.confusion.fp,
        fn_ = r.confusion.fn_,
        tp = r.confusion.tp,
        degenerate = r.degenerate.len(),
        "scored"
    );
    for (metric, value) in r.named_values() {
        tracing::debug!(
            model,
            partition,
            metric,
            value,
            degenerate = r.is_degenerate(metric),
            "metric"
        );
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_score.rs"]
mod tests;
