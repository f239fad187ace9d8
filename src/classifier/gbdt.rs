use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec, ValueType};
use gbdt::gradient_boost::GBDT;
use ndarray::{Array1, Array2};

use crate::classifier::{
    Classifier, ModelError, check_both_classes, check_feature_count, check_training_shape,
};
use crate::model::metrics::{ClassLabel, HAM, SPAM};

const NAME: &str = "gbdt";
const LOSS: &str = "LogLikelyhood";

/// Gradient-boosted regression trees on the log-likelihood loss, backed by `gbdt`.
///
/// The loss wants targets in `{-1, 1}`; spam maps to `1`. Predictions are the boosted
/// probability of spam, thresholded at one half.
pub struct GbdtClassifier {
    iterations: usize,
    learning_rate: f64,
    max_depth: u32,
    fitted: Option<FittedGbdt>,
}

struct FittedGbdt {
    model: GBDT,
    n_features: usize,
}

impl GbdtClassifier {
    pub fn new(iterations: usize, learning_rate: f64, max_depth: u32) -> Self {
        Self {
            iterations,
            learning_rate,
            max_depth,
            fitted: None,
        }
    }

    fn config(&self, n_features: usize) -> Config {
        let mut cfg = Config::new();
        cfg.set_feature_size(n_features);
        cfg.set_max_depth(self.max_depth);
        cfg.set_iterations(self.iterations);
        cfg.set_shrinkage(self.learning_rate as ValueType);
        cfg.set_loss(LOSS);
        cfg.set_debug(false);
        cfg.set_data_sample_ratio(1.0);
        cfg.set_feature_sample_ratio(1.0);
        cfg.set_training_optimization_level(2);
        cfg
    }
}

fn row_features(records: &Array2<f64>, row: usize) -> Vec<ValueType> {
    records.row(row).iter().map(|&v| v as ValueType).collect()
}

fn target(label: ClassLabel) -> ValueType {
    if label == SPAM { 1.0 } else { -1.0 }
}

impl Classifier for GbdtClassifier {
    fn name(&self) -> &'static str {
        NAME
    }

    fn fit(
        &mut self,
        records: &Array2<f64>,
        labels: &Array1<ClassLabel>,
    ) -> Result<(), ModelError> {
        check_training_shape(NAME, records, labels)?;
        check_both_classes(NAME, labels)?;
        if self.iterations == 0 || self.max_depth == 0 {
            return Err(ModelError::Fit {
                model: NAME,
                reason: "iterations and depth must be at least 1".to_string(),
            });
        }

        let mut train: DataVec = labels
            .iter()
            .enumerate()
            .map(|(row, &label)| {
                Data::new_training_data(row_features(records, row), 1.0, target(label), None)
            })
            .collect();
        let mut model = GBDT::new(&self.config(records.ncols()));
        model.fit(&mut train);
        tracing::debug!(
            model = NAME,
            rows = records.nrows(),
            features = records.ncols(),
            iterations = self.iterations,
            learning_rate = self.learning_rate,
            depth = self.max_depth,
            "boosted trees fitted"
        );
        self.fitted = Some(FittedGbdt {
            model,
            n_features: records.ncols(),
        });
        Ok(())
    }

    fn predict(&self, records: &Array2<f64>) -> Result<Vec<ClassLabel>, ModelError> {
        let fitted = self
            .fitted
            .as_ref()
            .ok_or(ModelError::NotFitted { model: NAME })?;
        check_feature_count(NAME, fitted.n_features, records)?;
        if records.nrows() == 0 {
            return Ok(Vec::new());
        }
        let rows: DataVec = (0..records.nrows())
            .map(|row| Data::new_test_data(row_features(records, row), None))
            .collect();
        let probabilities = fitted.model.predict(&rows);
        Ok(probabilities
            .iter()
            .map(|&p| if p >= 0.5 { SPAM } else { HAM })
            .collect())
    }
}
