use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Gbdt,
    Tree,
    Logistic,
}

impl ModelKind {
    pub fn name(self) -> &'static str {
        match self {
            ModelKind::Gbdt => "gbdt",
            ModelKind::Tree => "tree",
            ModelKind::Logistic => "logistic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelParams {
    /// Boosting rounds for `gbdt`.
    pub iterations: usize,
    /// Shrinkage applied to every boosted tree.
    pub learning_rate: f64,
    pub boost_depth: u32,
    /// Depth cap of the single decision tree; `None` grows it until leaves are pure.
    pub max_depth: Option<usize>,
    pub min_weight_leaf: f32,
    pub max_iterations: u64,
    pub alpha: f64,
    pub gradient_tolerance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalProfile {
    pub label_column: String,
    pub drop_columns: Vec<String>,
    pub test_fraction: f64,
    pub split_seed: u64,
    pub shuffle_seed: u64,
    pub models: Vec<ModelKind>,
    pub params: ModelParams,
}

impl EvalProfile {
    pub fn default_v1() -> Self {
        Self {
            label_column: "Label".to_string(),
            drop_columns: vec!["Fname".to_string()],
            test_fraction: 0.2,
            split_seed: 42,
            shuffle_seed: 42,
            models: vec![ModelKind::Gbdt],
            params: ModelParams {
                iterations: 1000,
                learning_rate: 1.0,
                boost_depth: 2,
                max_depth: Some(6),
                min_weight_leaf: 1.0,
                max_iterations: 1000,
                alpha: 1.0,
                gradient_tolerance: 1e-4,
            },
        }
    }

    /// Every classifier family, as in a side-by-side comparison run.
    pub fn compare_v1() -> Self {
        let mut base = Self::default_v1();
        base.models = vec![ModelKind::Gbdt, ModelKind::Tree, ModelKind::Logistic];
        base
    }
}
