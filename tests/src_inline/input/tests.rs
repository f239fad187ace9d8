use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::Compression;
use flate2::write::GzEncoder;

use super::encode::{ColumnKind, encode_features, parse_class_token};
use super::predictions::load_predictions;
use super::*;
use crate::model::metrics::{HAM, SPAM};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("hamspam_eval_input_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_file(path: &Path, contents: &str) {
    let mut f = BufWriter::new(File::create(path).unwrap());
    f.write_all(contents.as_bytes()).unwrap();
}

fn write_gz(path: &Path, contents: &str) {
    let mut enc = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    enc.write_all(contents.as_bytes()).unwrap();
    enc.finish().unwrap();
}

fn table(columns: &[&str], rows: &[&[&str]]) -> LabeledTable {
    LabeledTable {
        origin: "mem".to_string(),
        columns: columns.iter().map(|s| s.to_string()).collect(),
        rows: rows
            .iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect(),
    }
}

#[test]
fn test_load_plain_and_gz() {
    let dir = make_temp_dir();
    let plain = dir.join("ham.csv");
    let gz = dir.join("spam.csv.gz");
    write_file(&plain, "Fname,DKIM,Label\na.eml,pass,0\nb.eml,fail,0\n");
    write_gz(&gz, "Fname,DKIM,Label\nc.eml,fail,1\n");

    let ham = load_labeled_table(&plain, "Label", HAM).unwrap();
    assert_eq!(ham.columns, vec!["Fname", "DKIM", "Label"]);
    assert_eq!(ham.n_rows(), 2);

    let spam = load_labeled_table(&gz, "Label", SPAM).unwrap();
    assert_eq!(spam.rows, vec![vec!["c.eml", "fail", "1"]]);
}

#[test]
fn test_missing_label_column_uses_source_label() {
    let dir = make_temp_dir();
    let path = dir.join("spam.csv");
    write_file(&path, "To_count_addresses,DKIM\n3,fail\n1,pass\n");
    let t = load_labeled_table(&path, "Label", SPAM).unwrap();
    assert_eq!(t.columns.last().unwrap(), "Label");
    assert!(t.rows.iter().all(|r| r.last().unwrap() == "1"));
}

#[test]
fn test_missing_file_is_error() {
    let dir = make_temp_dir();
    let err = load_labeled_table(&dir.join("nope.csv"), "Label", HAM).unwrap_err();
    assert!(matches!(err, InputError::MissingInput(_)));
}

#[test]
fn test_duplicate_header_rejected() {
    let dir = make_temp_dir();
    let path = dir.join("dup.csv");
    write_file(&path, "a,a,Label\n1,2,0\n");
    assert!(matches!(read_table(&path), Err(InputError::Schema(_))));
}

#[test]
fn test_dedup_keeps_first_occurrence() {
    let mut t = table(
        &["x", "Label"],
        &[&["1", "0"], &["2", "0"], &["1", "0"], &["3", "1"], &["2", "0"]],
    );
    let removed = dedup_rows(&mut t);
    assert_eq!(removed, 2);
    let xs: Vec<&str> = t.rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(xs, vec!["1", "2", "3"]);
}

#[test]
fn test_concat_reorders_columns() {
    let a = table(&["x", "y", "Label"], &[&["1", "2", "0"]]);
    let b = table(&["Label", "y", "x"], &[&["1", "20", "10"]]);
    let merged = concat_tables(a, b).unwrap();
    assert_eq!(merged.rows[1], vec!["10", "20", "1"]);
}

#[test]
fn test_concat_rejects_different_columns() {
    let a = table(&["x", "Label"], &[&["1", "0"]]);
    let b = table(&["x", "z", "Label"], &[&["1", "2", "1"]]);
    assert!(matches!(concat_tables(a, b), Err(InputError::Schema(_))));
}

#[test]
fn test_encode_features_kinds() {
    let t = table(
        &["Fname", "count", "flag", "spf", "Label"],
        &[
            &["a", "2", "true", "pass", "0"],
            &["b", "", "FALSE", "fail", "spam"],
            &["c", "1.5", "True", "ok", "1"],
        ],
    );
    let m = encode_features(&t, "Label", &["Fname".to_string()]).unwrap();
    assert_eq!(m.feature_names, vec!["count", "flag", "spf"]);
    assert_eq!(m.column_kinds[0], ColumnKind::Numeric);
    assert_eq!(m.column_kinds[1], ColumnKind::Boolean);
    assert!(matches!(m.column_kinds[2], ColumnKind::Categorical(_)));
    let names: Vec<&str> = m.column_kinds.iter().map(ColumnKind::name).collect();
    assert_eq!(names, vec!["numeric", "boolean", "categorical"]);
    assert_eq!(m.column_kinds[0].levels(), None);
    assert_eq!(m.column_kinds[2].levels(), Some(3));

    assert_eq!(m.records.row(0).to_vec(), vec![2.0, 1.0, 2.0]);
    assert_eq!(m.records.row(1).to_vec(), vec![0.0, 0.0, 0.0]);
    assert_eq!(m.records.row(2).to_vec(), vec![1.5, 1.0, 1.0]);
    assert_eq!(m.labels.to_vec(), vec![0, 1, 1]);
    assert_eq!(m.class_counts(), (1, 2));
}

#[test]
fn test_encode_rejects_bad_label() {
    let t = table(&["x", "Label"], &[&["1", "0"], &["2", "maybe"]]);
    let err = encode_features(&t, "Label", &[]).unwrap_err();
    match err {
        InputError::InvalidLabel { row, value, .. } => {
            assert_eq!(row, 2);
            assert_eq!(value, "maybe");
        }
        other => panic!("unexpected error: {other}"),
    }
    let t = table(&["x", "Label"], &[&["1", "2"]]);
    assert!(matches!(
        encode_features(&t, "Label", &[]),
        Err(InputError::InvalidLabel { .. })
    ));
}

#[test]
fn test_encode_requires_feature_columns() {
    let t = table(&["Fname", "Label"], &[&["a", "0"]]);
    assert!(matches!(
        encode_features(&t, "Label", &["Fname".to_string()]),
        Err(InputError::Schema(_))
    ));
}

#[test]
fn test_parse_class_token() {
    assert_eq!(parse_class_token("Ham"), Some(0));
    assert_eq!(parse_class_token(" spam "), Some(1));
    assert_eq!(parse_class_token("1.0"), Some(1));
    assert_eq!(parse_class_token("3"), Some(3));
    assert_eq!(parse_class_token("-1"), None);
    assert_eq!(parse_class_token("x"), None);
}

#[test]
fn test_load_predictions() {
    let dir = make_temp_dir();
    let path = dir.join("preds.csv");
    write_file(&path, "id,y_true,y_pred\n1,0,0\n2,1,0\n3,spam,1\n");
    let p = load_predictions(&path, "y_true", "y_pred").unwrap();
    assert_eq!(p.y_true, vec![0, 1, 1]);
    assert_eq!(p.y_pred, vec![0, 0, 1]);

    let err = load_predictions(&path, "truth", "y_pred").unwrap_err();
    assert!(matches!(err, InputError::Schema(_)));
}
