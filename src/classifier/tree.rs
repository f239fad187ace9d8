use linfa::Dataset;
use linfa::traits::{Fit, Predict};
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Array2};

use crate::classifier::{Classifier, ModelError, check_feature_count, check_training_shape};
use crate::model::metrics::ClassLabel;

const NAME: &str = "tree";

/// CART decision tree (Gini impurity) backed by `linfa-trees`.
pub struct TreeClassifier {
    max_depth: Option<usize>,
    min_weight_leaf: f32,
    fitted: Option<FittedTree>,
}

struct FittedTree {
    model: DecisionTree<f64, ClassLabel>,
    n_features: usize,
}

impl TreeClassifier {
    pub fn new(max_depth: Option<usize>, min_weight_leaf: f32) -> Self {
        Self {
            max_depth,
            min_weight_leaf,
            fitted: None,
        }
    }
}

impl Classifier for TreeClassifier {
    fn name(&self) -> &'static str {
        NAME
    }

    fn fit(
        &mut self,
        records: &Array2<f64>,
        labels: &Array1<ClassLabel>,
    ) -> Result<(), ModelError> {
        check_training_shape(NAME, records, labels)?;
        let dataset = Dataset::new(records.clone(), labels.clone());
        let model = DecisionTree::<f64, ClassLabel>::params()
            .split_quality(SplitQuality::Gini)
            .max_depth(self.max_depth)
            .min_weight_leaf(self.min_weight_leaf)
            .fit(&dataset)
            .map_err(|e| ModelError::Fit {
                model: NAME,
                reason: e.to_string(),
            })?;
        tracing::debug!(
            model = NAME,
            rows = records.nrows(),
            features = records.ncols(),
            depth = model.max_depth(),
            leaves = model.num_leaves(),
            "decision tree fitted"
        );
        self.fitted = Some(FittedTree {
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
        let predictions: Array1<ClassLabel> = fitted.model.predict(records);
        Ok(predictions.to_vec())
    }
}
