use serde::Serialize;

/// Class index used throughout the crate: `0` is ham (negative), `1` is spam (positive).
pub type ClassLabel = usize;

pub const HAM: ClassLabel = 0;
pub const SPAM: ClassLabel = 1;

pub const FBETA_BETAS: [f64; 3] = [0.5, 0.95, 2.0];

/// Row-major flattening of the 2x2 confusion matrix (row = truth, column = prediction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ConfusionCounts {
    pub tn: u64,
    pub fp: u64,
    #[serde(rename = "fn")]
    pub fn_: u64,
    pub tp: u64,
}

impl ConfusionCounts {
    pub fn total(&self) -> u64 {
        self.tn + self.fp + self.fn_ + self.tp
    }

    /// `[[tn, fp], [fn, tp]]`
    pub fn matrix(&self) -> [[u64; 2]; 2] {
        [[self.tn, self.fp], [self.fn_, self.tp]]
    }
}

/// Metrics whose mathematical preconditions were not met; their value was replaced by 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateMetric {
    Precision,
    Recall,
    F1,
    #[serde(rename = "fbeta_0_5")]
    Fbeta0_5,
    #[serde(rename = "fbeta_0_95")]
    Fbeta0_95,
    #[serde(rename = "fbeta_2")]
    Fbeta2,
    MatthewsCorrcoef,
}

impl DegenerateMetric {
    pub fn name(self) -> &'static str {
        match self {
            DegenerateMetric::Precision => "precision",
            DegenerateMetric::Recall => "recall",
            DegenerateMetric::F1 => "f1",
            DegenerateMetric::Fbeta0_5 => "fbeta_0_5",
            DegenerateMetric::Fbeta0_95 => "fbeta_0_95",
            DegenerateMetric::Fbeta2 => "fbeta_2",
            DegenerateMetric::MatthewsCorrcoef => "matthews_corrcoef",
        }
    }

    pub fn fbeta(idx: usize) -> Self {
        match idx {
            0 => DegenerateMetric::Fbeta0_5,
            1 => DegenerateMetric::Fbeta0_95,
            _ => DegenerateMetric::Fbeta2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricReport {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub fbeta_0_5: f64,
    pub fbeta_0_95: f64,
    pub fbeta_2: f64,
    /// Matthews correlation coefficient scaled by 100.
    pub matthews_corrcoef: f64,
    /// Fowlkes-Mallows index scaled by 100.
    pub fowlkes_mallows: f64,
    pub confusion: ConfusionCounts,
    pub degenerate: Vec<DegenerateMetric>,
}

impl MetricReport {
    /// Scalar metrics in report order. The confusion counts follow them.
    pub fn named_values(&self) -> [(&'static str, f64); 9] {
        [
            ("accuracy", self.accuracy),
            ("precision", self.precision),
            ("recall", self.recall),
            ("f1", self.f1),
            ("fbeta_0_5", self.fbeta_0_5),
            ("fbeta_0_95", self.fbeta_0_95),
            ("fbeta_2", self.fbeta_2),
            ("matthews_corrcoef", self.matthews_corrcoef),
            ("fowlkes_mallows", self.fowlkes_mallows),
        ]
    }

    pub fn n_samples(&self) -> u64 {
        self.confusion.total()
    }

    /// Whether the metric called `name` (as in [`Self::named_values`]) fell back to 0.0.
    pub fn is_degenerate(&self, name: &str) -> bool {
        self.degenerate.iter().any(|m| m.name() == name)
    }
}
