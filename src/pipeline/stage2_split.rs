use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::input::encode::{FeatureMatrix, encode_features};
use crate::input::{InputError, LabeledTable};

#[derive(Debug, Clone)]
pub struct Stage2Params<'a> {
    pub label_column: &'a str,
    pub drop_columns: &'a [String],
    pub test_fraction: f64,
    pub split_seed: u64,
    pub shuffle_seed: u64,
}

#[derive(Debug, Clone)]
pub struct SplitData {
    pub train: FeatureMatrix,
    pub test: FeatureMatrix,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitStats {
    pub train_rows: usize,
    pub test_rows: usize,
    pub n_features: usize,
    pub features: Vec<FeatureSummary>,
}

/// How one input column was encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSummary {
    pub name: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub levels: Option<usize>,
}

impl SplitData {
    pub fn stats(&self) -> SplitStats {
        let features = self
            .train
            .feature_names
            .iter()
            .zip(&self.train.column_kinds)
            .map(|(name, kind)| FeatureSummary {
                name: name.clone(),
                kind: kind.name(),
                levels: kind.levels(),
            })
            .collect();
        SplitStats {
            train_rows: self.train.n_rows(),
            test_rows: self.test.n_rows(),
            n_features: self.train.feature_names.len(),
            features,
        }
    }
}

pub fn run_stage2(
    mut table: LabeledTable,
    params: &Stage2Params<'_>,
) -> Result<SplitData, InputError> {
    shuffle_rows(&mut table, params.shuffle_seed);
    let matrix = encode_features(&table, params.label_column, params.drop_columns)?;
    let (train_idx, test_idx) =
        split_indices(matrix.n_rows(), params.test_fraction, params.split_seed)?;

    let split = SplitData {
        train: matrix.select(&train_idx),
        test: matrix.select(&test_idx),
    };
    let (train_ham, train_spam) = split.train.class_counts();
    let (test_ham, test_spam) = split.test.class_counts();
    tracing::info!(
        train_ham,
        train_spam,
        test_ham,
        test_spam,
        features = matrix.feature_names.len(),
        "train/test split"
    );
    Ok(split)
}

pub fn shuffle_rows(table: &mut LabeledTable, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    table.rows.shuffle(&mut rng);
}

/// Seeded permutation of `0..n`; the first `ceil(test_fraction * n)` entries form the test set.
pub fn split_indices(
    n: usize,
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>), InputError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(InputError::InvalidInput(format!(
            "test fraction must be in (0, 1), got {test_fraction}"
        )));
    }
    let n_test = (test_fraction * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(InputError::InvalidInput(format!(
            "cannot split {n} rows with test fraction {test_fraction}: a partition would be empty"
        )));
    }

    let mut permutation: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    permutation.shuffle(&mut rng);
    let train = permutation.split_off(n_test);
    Ok((train, permutation))
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_split.rs"]
mod tests;
