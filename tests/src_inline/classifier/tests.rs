use super::*;
use crate::model::metrics::{HAM, SPAM};
use crate::model::profile::EvalProfile;
use ndarray::array;

fn separable() -> (Array2<f64>, Array1<ClassLabel>) {
    let records = array![
        [0.0, 1.0],
        [1.0, 0.0],
        [2.0, 1.0],
        [3.0, 0.0],
        [10.0, 1.0],
        [11.0, 0.0],
        [12.0, 1.0],
        [13.0, 0.0]
    ];
    let labels = array![0, 0, 0, 0, 1, 1, 1, 1];
    (records, labels)
}

#[test]
fn test_tree_fits_separable_data() {
    let (records, labels) = separable();
    let mut model = TreeClassifier::new(Some(4), 1.0);
    model.fit(&records, &labels).unwrap();
    let pred = model.predict(&records).unwrap();
    assert_eq!(pred, labels.to_vec());
}

#[test]
fn test_gbdt_fits_separable_data() {
    let (records, labels) = separable();
    let mut model = GbdtClassifier::new(100, 0.3, 2);
    model.fit(&records, &labels).unwrap();
    let pred = model.predict(&records).unwrap();
    assert_eq!(pred, labels.to_vec());

    let unseen = array![[-5.0, 0.0], [40.0, 1.0]];
    assert_eq!(model.predict(&unseen).unwrap(), vec![HAM, SPAM]);
}

#[test]
fn test_gbdt_default_profile_fits() {
    let (records, labels) = separable();
    let params = EvalProfile::default_v1().params;
    let mut model = build_classifier(ModelKind::Gbdt, &params);
    model.fit(&records, &labels).unwrap();
    assert_eq!(model.predict(&records).unwrap(), labels.to_vec());
}

#[test]
fn test_gbdt_rejects_single_class_and_checks_features() {
    let (records, labels) = separable();
    let mut model = GbdtClassifier::new(10, 0.5, 2);
    assert!(matches!(
        model.predict(&records),
        Err(ModelError::NotFitted { model: "gbdt" })
    ));
    let one_class = Array1::from_elem(records.nrows(), SPAM);
    assert!(matches!(
        model.fit(&records, &one_class),
        Err(ModelError::SingleClass { model: "gbdt" })
    ));
    model.fit(&records, &labels).unwrap();
    assert!(matches!(
        model.predict(&array![[1.0, 2.0, 3.0]]),
        Err(ModelError::ShapeMismatch {
            expected: 2,
            got: 3,
            ..
        })
    ));
}

#[test]
fn test_logistic_fits_separable_data() {
    let (records, labels) = separable();
    let mut model = LogisticClassifier::new(1000, 1.0, 1e-4);
    model.fit(&records, &labels).unwrap();
    let pred = model.predict(&records).unwrap();
    assert_eq!(pred, labels.to_vec());
}

#[test]
fn test_predict_before_fit_is_error() {
    let (records, _) = separable();
    let model = TreeClassifier::new(Some(2), 1.0);
    assert!(matches!(
        model.predict(&records),
        Err(ModelError::NotFitted { model: "tree" })
    ));
}

#[test]
fn test_feature_count_checked() {
    let (records, labels) = separable();
    let mut model = TreeClassifier::new(Some(2), 1.0);
    model.fit(&records, &labels).unwrap();
    let narrow = array![[1.0], [2.0]];
    assert!(matches!(
        model.predict(&narrow),
        Err(ModelError::ShapeMismatch {
            expected: 2,
            got: 1,
            ..
        })
    ));
}

#[test]
fn test_logistic_rejects_single_class() {
    let (records, _) = separable();
    let labels = Array1::from_elem(records.nrows(), 0usize);
    let mut model = LogisticClassifier::new(100, 1.0, 1e-4);
    assert!(matches!(
        model.fit(&records, &labels),
        Err(ModelError::SingleClass { .. })
    ));
}

#[test]
fn test_label_count_checked() {
    let (records, _) = separable();
    let labels = array![0, 1];
    let mut model = TreeClassifier::new(None, 1.0);
    assert!(matches!(
        model.fit(&records, &labels),
        Err(ModelError::LabelCount {
            records: 8,
            labels: 2,
            ..
        })
    ));
}

#[test]
fn test_build_classifier_names() {
    let profile = EvalProfile::compare_v1();
    let names: Vec<&str> = profile
        .models
        .iter()
        .map(|&kind| build_classifier(kind, &profile.params).name())
        .collect();
    assert_eq!(names, vec!["gbdt", "tree", "logistic"]);
}
