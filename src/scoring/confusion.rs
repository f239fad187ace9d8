use crate::model::metrics::{ClassLabel, ConfusionCounts, HAM, SPAM};
use crate::scoring::ScoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Truth,
    Prediction,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Truth => f.write_str("y_true"),
            Side::Prediction => f.write_str("y_pred"),
        }
    }
}

/// Counts the 2x2 contingency table after validating alignment and label domain.
pub fn count_confusion(
    y_true: &[ClassLabel],
    y_pred: &[ClassLabel],
) -> Result<ConfusionCounts, ScoreError> {
    if y_true.len() != y_pred.len() {
        return Err(ScoreError::LengthMismatch {
            y_true: y_true.len(),
            y_pred: y_pred.len(),
        });
    }
    if y_true.is_empty() {
        return Err(ScoreError::Empty);
    }

    let mut counts = ConfusionCounts::default();
    for (index, (&t, &p)) in y_true.iter().zip(y_pred.iter()).enumerate() {
        check_label(t, index, Side::Truth)?;
        check_label(p, index, Side::Prediction)?;
        match (t, p) {
            (HAM, HAM) => counts.tn += 1,
            (HAM, SPAM) => counts.fp += 1,
            (SPAM, HAM) => counts.fn_ += 1,
            _ => counts.tp += 1,
        }
    }
    Ok(counts)
}

fn check_label(value: ClassLabel, index: usize, side: Side) -> Result<(), ScoreError> {
    if value == HAM || value == SPAM {
        Ok(())
    } else {
        Err(ScoreError::InvalidLabel { index, value, side })
    }
}
