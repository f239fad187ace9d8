use ndarray::{Array1, Array2};

use super::*;
use crate::input::encode::{ColumnKind, FeatureMatrix};
use crate::model::profile::EvalProfile;

fn separable(offset: usize, n: usize) -> FeatureMatrix {
    let mut records = Array2::<f64>::zeros((n, 2));
    let mut labels = Array1::<ClassLabel>::zeros(n);
    for i in 0..n {
        let spam = (i + offset) % 2;
        let base = if spam == 1 { 20.0 } else { 0.0 };
        records[[i, 0]] = base + (i % 5) as f64;
        records[[i, 1]] = (i % 3) as f64;
        labels[i] = spam;
    }
    FeatureMatrix {
        feature_names: vec!["hops".to_string(), "noise".to_string()],
        column_kinds: vec![ColumnKind::Numeric, ColumnKind::Numeric],
        records,
        labels,
    }
}

#[test]
fn test_run_stage3_predicts_both_partitions() {
    let split = SplitData {
        train: separable(0, 40),
        test: separable(1, 10),
    };
    let profile = EvalProfile::compare_v1();
    let preds = run_stage3(&split, &profile.models, &profile.params).unwrap();

    assert_eq!(preds.len(), 3);
    assert_eq!(preds[0].model, "gbdt");
    assert_eq!(preds[1].model, "tree");
    assert_eq!(preds[2].model, "logistic");
    for p in &preds {
        assert_eq!(p.train.len(), 40);
        assert_eq!(p.test.len(), 10);
        assert_eq!(p.for_partition(Partition::Test), split.test.labels.as_slice().unwrap());
    }
    assert_eq!(preds[0].train, split.train.labels.to_vec());
    assert_eq!(preds[1].train, split.train.labels.to_vec());
}

#[test]
fn test_run_stage3_no_models() {
    let split = SplitData {
        train: separable(0, 10),
        test: separable(0, 4),
    };
    let profile = EvalProfile::default_v1();
    assert!(run_stage3(&split, &[], &profile.params).unwrap().is_empty());
}
