//! Binary classification scoring.
//!
//! [`score`] turns an aligned pair of label vectors into a [`MetricReport`]. Metrics whose
//! preconditions are not met (for example recall when no positive sample exists) are reported
//! as `0.0` and listed in [`MetricReport::degenerate`] instead of failing the whole report.

pub mod confusion;

use thiserror::Error;

use crate::model::metrics::{
    ClassLabel, ConfusionCounts, DegenerateMetric, FBETA_BETAS, MetricReport,
};
use confusion::{Side, count_confusion};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("invalid input: y_true has {y_true} labels but y_pred has {y_pred}")]
    LengthMismatch { y_true: usize, y_pred: usize },
    #[error("invalid input: {side}[{index}] = {value} is not a binary class label (expected 0 or 1)")]
    InvalidLabel {
        index: usize,
        value: ClassLabel,
        side: Side,
    },
    #[error("invalid input: cannot score empty label vectors")]
    Empty,
}

pub fn score(y_true: &[ClassLabel], y_pred: &[ClassLabel]) -> Result<MetricReport, ScoreError> {
    let counts = count_confusion(y_true, y_pred)?;
    let report = score_counts(&counts);
    for metric in &report.degenerate {
        tracing::warn!(
            metric = metric.name(),
            "metric is undefined for these labels; reporting 0.0"
        );
    }
    Ok(report)
}

/// Computes every metric from an already validated, non-empty confusion table.
pub fn score_counts(counts: &ConfusionCounts) -> MetricReport {
    let mut degenerate = Vec::new();
    let n = counts.total() as f64;
    let positive = ClassCounts::positive(counts);

    let accuracy = (counts.tp + counts.tn) as f64 / n;

    let precision = match positive.precision() {
        Some(v) => v,
        None => {
            degenerate.push(DegenerateMetric::Precision);
            0.0
        }
    };
    let recall = match positive.recall() {
        Some(v) => v,
        None => {
            degenerate.push(DegenerateMetric::Recall);
            0.0
        }
    };

    if !positive.is_well_defined() {
        degenerate.push(DegenerateMetric::F1);
    }
    let f1 = positive.fbeta(1.0);

    let mut fbetas = [0.0f64; 3];
    for (idx, &beta) in FBETA_BETAS.iter().enumerate() {
        let (value, well_defined) = macro_fbeta(counts, beta);
        if !well_defined {
            degenerate.push(DegenerateMetric::fbeta(idx));
        }
        fbetas[idx] = value;
    }

    let matthews_corrcoef = match matthews(counts) {
        Some(v) => v * 100.0,
        None => {
            degenerate.push(DegenerateMetric::MatthewsCorrcoef);
            0.0
        }
    };

    MetricReport {
        accuracy,
        precision,
        recall,
        f1,
        fbeta_0_5: fbetas[0],
        fbeta_0_95: fbetas[1],
        fbeta_2: fbetas[2],
        matthews_corrcoef,
        fowlkes_mallows: fowlkes_mallows(counts) * 100.0,
        confusion: *counts,
        degenerate,
    }
}

/// One-vs-rest counts for a single class.
#[derive(Debug, Clone, Copy)]
struct ClassCounts {
    tp: u64,
    fp: u64,
    fn_: u64,
}

impl ClassCounts {
    fn positive(c: &ConfusionCounts) -> Self {
        Self {
            tp: c.tp,
            fp: c.fp,
            fn_: c.fn_,
        }
    }

    fn negative(c: &ConfusionCounts) -> Self {
        Self {
            tp: c.tn,
            fp: c.fn_,
            fn_: c.fp,
        }
    }

    fn precision(&self) -> Option<f64> {
        ratio(self.tp, self.tp + self.fp)
    }

    fn recall(&self) -> Option<f64> {
        ratio(self.tp, self.tp + self.fn_)
    }

    fn is_well_defined(&self) -> bool {
        self.precision().is_some() && self.recall().is_some()
    }

    /// Appears in the truth or in the predictions.
    fn is_present(&self) -> bool {
        self.tp + self.fp + self.fn_ > 0
    }

    fn fbeta(&self, beta: f64) -> f64 {
        let b2 = beta * beta;
        let tp = self.tp as f64;
        let denom = (1.0 + b2) * tp + b2 * self.fn_ as f64 + self.fp as f64;
        if denom == 0.0 {
            0.0
        } else {
            (1.0 + b2) * tp / denom
        }
    }
}

/// Unweighted mean of per-class F-beta over the classes present in either vector.
fn macro_fbeta(counts: &ConfusionCounts, beta: f64) -> (f64, bool) {
    let mut sum = 0.0;
    let mut n_classes = 0usize;
    let mut well_defined = true;
    for class in [ClassCounts::negative(counts), ClassCounts::positive(counts)] {
        if !class.is_present() {
            continue;
        }
        well_defined &= class.is_well_defined();
        sum += class.fbeta(beta);
        n_classes += 1;
    }
    if n_classes == 0 {
        return (0.0, false);
    }
    (sum / n_classes as f64, well_defined)
}

fn matthews(c: &ConfusionCounts) -> Option<f64> {
    let (tp, tn, fp, fn_) = (c.tp as f64, c.tn as f64, c.fp as f64, c.fn_ as f64);
    let denom = (tp + fp) * (tp + fn_) * (tn + fp) * (tn + fn_);
    if denom == 0.0 {
        return None;
    }
    Some((tp * tn - fp * fn_) / denom.sqrt())
}

/// Pair-counting Fowlkes-Mallows index between the true and the predicted partition.
fn fowlkes_mallows(c: &ConfusionCounts) -> f64 {
    let m = c.matrix();
    let n = c.total() as f64;
    let mut tk = -n;
    let mut pk = -n;
    let mut qk = -n;
    for i in 0..2 {
        let row = (m[i][0] + m[i][1]) as f64;
        let col = (m[0][i] + m[1][i]) as f64;
        qk += row * row;
        pk += col * col;
        for j in 0..2 {
            let v = m[i][j] as f64;
            tk += v * v;
        }
    }
    if tk == 0.0 {
        return 0.0;
    }
    (tk / pk).sqrt() * (tk / qk).sqrt()
}

fn ratio(num: u64, denom: u64) -> Option<f64> {
    if denom == 0 {
        None
    } else {
        Some(num as f64 / denom as f64)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/scoring/tests.rs"]
mod tests;
