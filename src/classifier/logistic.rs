use linfa::Dataset;
use linfa::traits::{Fit, Predict};
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use ndarray::{Array1, Array2, Axis};

use crate::classifier::{
    Classifier, ModelError, check_both_classes, check_feature_count, check_training_shape,
};
use crate::model::metrics::ClassLabel;

const NAME: &str = "logistic";

/// L2-regularised logistic regression backed by `linfa-logistic`.
///
/// Features are standardised with the training mean and deviation before they reach the
/// optimiser; constant columns are only centred.
pub struct LogisticClassifier {
    max_iterations: u64,
    alpha: f64,
    gradient_tolerance: f64,
    fitted: Option<FittedLogistic>,
}

struct FittedLogistic {
    model: FittedLogisticRegression<f64, ClassLabel>,
    scaler: Standardizer,
}

#[derive(Debug, Clone)]
struct Standardizer {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl Standardizer {
    fn fit(records: &Array2<f64>) -> Self {
        let n = records.nrows() as f64;
        let mean = records.sum_axis(Axis(0)) / n;
        let mut scale = Array1::zeros(records.ncols());
        for (j, column) in records.axis_iter(Axis(1)).enumerate() {
            let var = column.iter().map(|v| (v - mean[j]).powi(2)).sum::<f64>() / n;
            let sd = var.sqrt();
            scale[j] = if sd > 0.0 { sd } else { 1.0 };
        }
        Self { mean, scale }
    }

    fn transform(&self, records: &Array2<f64>) -> Array2<f64> {
        (records - &self.mean) / &self.scale
    }
}

impl LogisticClassifier {
    pub fn new(max_iterations: u64, alpha: f64, gradient_tolerance: f64) -> Self {
        Self {
            max_iterations,
            alpha,
            gradient_tolerance,
            fitted: None,
        }
    }
}

impl Classifier for LogisticClassifier {
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

        let scaler = Standardizer::fit(records);
        let dataset = Dataset::new(scaler.transform(records), labels.clone());
        let model = LogisticRegression::<f64>::default()
            .max_iterations(self.max_iterations)
            .alpha(self.alpha)
            .gradient_tolerance(self.gradient_tolerance)
            .fit(&dataset)
            .map_err(|e| ModelError::Fit {
                model: NAME,
                reason: e.to_string(),
            })?;
        tracing::debug!(
            model = NAME,
            rows = records.nrows(),
            features = records.ncols(),
            intercept = model.intercept(),
            "logistic regression fitted"
        );
        self.fitted = Some(FittedLogistic { model, scaler });
        Ok(())
    }

    fn predict(&self, records: &Array2<f64>) -> Result<Vec<ClassLabel>, ModelError> {
        let fitted = self
            .fitted
            .as_ref()
            .ok_or(ModelError::NotFitted { model: NAME })?;
        check_feature_count(NAME, fitted.scaler.mean.len(), records)?;
        let scaled = fitted.scaler.transform(records);
        let predictions: Array1<ClassLabel> = fitted.model.predict(&scaled);
        Ok(predictions.to_vec())
    }
}
