//! Adapters over external statistical learners.
//!
//! Every learner is reached through [`Classifier`], so the pipeline can fit and score any
//! number of models without knowing which library sits behind them.

pub mod gbdt;
pub mod logistic;
pub mod tree;

use ndarray::{Array1, Array2};
use thiserror::Error;

use crate::model::metrics::{ClassLabel, HAM, SPAM};
use crate::model::profile::{ModelKind, ModelParams};

pub use gbdt::GbdtClassifier;
pub use logistic::LogisticClassifier;
pub use tree::TreeClassifier;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{model}: predict called before fit")]
    NotFitted { model: &'static str },
    #[error("{model}: training failed: {reason}")]
    Fit { model: &'static str, reason: String },
    #[error("{model}: expected {expected} feature columns, got {got}")]
    ShapeMismatch {
        model: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("{model}: {records} feature rows but {labels} labels")]
    LabelCount {
        model: &'static str,
        records: usize,
        labels: usize,
    },
    #[error("{model}: cannot train on an empty table")]
    Empty { model: &'static str },
    #[error("{model}: training labels contain a single class")]
    SingleClass { model: &'static str },
}

pub trait Classifier {
    fn name(&self) -> &'static str;
    fn fit(&mut self, records: &Array2<f64>, labels: &Array1<ClassLabel>)
    -> Result<(), ModelError>;
    fn predict(&self, records: &Array2<f64>) -> Result<Vec<ClassLabel>, ModelError>;
}

pub fn build_classifier(kind: ModelKind, params: &ModelParams) -> Box<dyn Classifier> {
    match kind {
        ModelKind::Gbdt => Box::new(GbdtClassifier::new(
            params.iterations,
            params.learning_rate,
            params.boost_depth,
        )),
        ModelKind::Tree => Box::new(TreeClassifier::new(params.max_depth, params.min_weight_leaf)),
        ModelKind::Logistic => Box::new(LogisticClassifier::new(
            params.max_iterations,
            params.alpha,
            params.gradient_tolerance,
        )),
    }
}

fn check_training_shape(
    model: &'static str,
    records: &Array2<f64>,
    labels: &Array1<ClassLabel>,
) -> Result<(), ModelError> {
    if records.nrows() == 0 {
        return Err(ModelError::Empty { model });
    }
    if records.nrows() != labels.len() {
        return Err(ModelError::LabelCount {
            model,
            records: records.nrows(),
            labels: labels.len(),
        });
    }
    Ok(())
}

fn check_both_classes(model: &'static str, labels: &Array1<ClassLabel>) -> Result<(), ModelError> {
    let has_ham = labels.iter().any(|&l| l == HAM);
    let has_spam = labels.iter().any(|&l| l == SPAM);
    if !(has_ham && has_spam) {
        return Err(ModelError::SingleClass { model });
    }
    Ok(())
}

fn check_feature_count(
    model: &'static str,
    expected: usize,
    records: &Array2<f64>,
) -> Result<(), ModelError> {
    if records.ncols() != expected {
        return Err(ModelError::ShapeMismatch {
            model,
            expected,
            got: records.ncols(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/classifier/tests.rs"]
mod tests;
