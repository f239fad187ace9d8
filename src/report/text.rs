use crate::model::metrics::MetricReport;
use crate::report::format_metric;

/// Human-readable block for one (model, partition) pair: a title line, the nine scalar
/// metrics and the confusion counts, closed by two blank lines.
pub fn render_score_block(title: &str, r: &MetricReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{title} Scores\n"));
    out.push_str(&format!("Accuracy: {}\n", format_metric(r.accuracy)));
    out.push_str(&format!("Precision: {}\n", format_metric(r.precision)));
    out.push_str(&format!("Recall: {}\n", format_metric(r.recall)));
    out.push_str(&format!("F1: {}\n", format_metric(r.f1)));
    out.push_str(&format!("Fbeta - 0,5: {}\n", format_metric(r.fbeta_0_5)));
    out.push_str(&format!("Fbeta - 0,95: {}\n", format_metric(r.fbeta_0_95)));
    out.push_str(&format!("Fbeta - 2: {}\n", format_metric(r.fbeta_2)));
    out.push_str(&format!(
        "matthews_corrcoef: {}\n",
        format_metric(r.matthews_corrcoef)
    ));
    out.push_str(&format!(
        "fowlkes_mallows: {}\n",
        format_metric(r.fowlkes_mallows)
    ));
    out.push_str("Confusion matrix\n");
    let c = &r.confusion;
    out.push_str(&format!(
        "TN: {}, FP: {}, FN: {}, TP: {}\n",
        c.tn, c.fp, c.fn_, c.tp
    ));
    out.push_str("\n\n");
    out
}

pub fn block_title(model: &str, partition_title: &str) -> String {
    format!("{model} {partition_title}")
}
