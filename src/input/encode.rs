use std::collections::BTreeMap;

use ndarray::{Array1, Array2};

use crate::input::{InputError, LabeledTable};
use crate::model::metrics::{ClassLabel, HAM, SPAM};

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnKind {
    Numeric,
    Boolean,
    /// Ordinal code per distinct value, codes assigned in sorted value order.
    Categorical(BTreeMap<String, usize>),
}

impl ColumnKind {
    pub fn name(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Categorical(_) => "categorical",
        }
    }

    /// Number of distinct values of a categorical column.
    pub fn levels(&self) -> Option<usize> {
        match self {
            ColumnKind::Categorical(map) => Some(map.len()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub feature_names: Vec<String>,
    pub column_kinds: Vec<ColumnKind>,
    pub records: Array2<f64>,
    pub labels: Array1<ClassLabel>,
}

impl FeatureMatrix {
    pub fn n_rows(&self) -> usize {
        self.records.nrows()
    }

    pub fn class_counts(&self) -> (usize, usize) {
        let spam = self.labels.iter().filter(|&&l| l == SPAM).count();
        (self.labels.len() - spam, spam)
    }

    /// Rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> FeatureMatrix {
        FeatureMatrix {
            feature_names: self.feature_names.clone(),
            column_kinds: self.column_kinds.clone(),
            records: self.records.select(ndarray::Axis(0), indices),
            labels: self.labels.select(ndarray::Axis(0), indices),
        }
    }
}

/// Parses a class token: `0|ham|false` and `1|spam|true` (case-insensitive) map to the two
/// classes; other integers pass through unchanged so the scorer can reject them.
pub fn parse_class_token(raw: &str) -> Option<ClassLabel> {
    let token = raw.trim().to_ascii_lowercase();
    match token.as_str() {
        "ham" | "false" => return Some(HAM),
        "spam" | "true" => return Some(SPAM),
        _ => {}
    }
    if let Ok(v) = token.parse::<usize>() {
        return Some(v);
    }
    match token.parse::<f64>() {
        Ok(v) if v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 => Some(v as usize),
        _ => None,
    }
}

pub fn encode_features(
    table: &LabeledTable,
    label_column: &str,
    drop_columns: &[String],
) -> Result<FeatureMatrix, InputError> {
    let label_idx = table.column_index(label_column).ok_or_else(|| {
        InputError::Schema(format!("{} has no {label_column:?} column", table.origin))
    })?;
    for name in drop_columns {
        if table.column_index(name).is_none() {
            tracing::debug!(column = %name, "drop column not present");
        }
    }

    let feature_idx: Vec<usize> = (0..table.columns.len())
        .filter(|&i| i != label_idx && !drop_columns.contains(&table.columns[i]))
        .collect();
    if feature_idx.is_empty() {
        return Err(InputError::Schema(format!(
            "{} has no feature columns left after dropping {label_column:?} and {drop_columns:?}",
            table.origin
        )));
    }

    let mut labels = Vec::with_capacity(table.n_rows());
    for (row_no, row) in table.rows.iter().enumerate() {
        let raw = &row[label_idx];
        match parse_class_token(raw) {
            Some(l) if l == HAM || l == SPAM => labels.push(l),
            _ => {
                return Err(InputError::InvalidLabel {
                    origin: table.origin.clone(),
                    row: row_no + 1,
                    value: raw.clone(),
                });
            }
        }
    }

    let n_rows = table.n_rows();
    let n_features = feature_idx.len();
    let mut kinds = Vec::with_capacity(n_features);
    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(n_features);
    for &col in &feature_idx {
        let values: Vec<&str> = table.rows.iter().map(|r| r[col].as_str()).collect();
        let kind = detect_kind(&values);
        columns.push(encode_column(&values, &kind));
        if let ColumnKind::Categorical(map) = &kind {
            tracing::debug!(
                column = %table.columns[col],
                levels = map.len(),
                "categorical column ordinal-encoded"
            );
        }
        kinds.push(kind);
    }

    let mut data = Vec::with_capacity(n_rows * n_features);
    for row in 0..n_rows {
        for column in &columns {
            data.push(column[row]);
        }
    }
    let records = Array2::from_shape_vec((n_rows, n_features), data)
        .map_err(|e| InputError::InvalidInput(format!("feature matrix shape: {e}")))?;

    Ok(FeatureMatrix {
        feature_names: feature_idx
            .iter()
            .map(|&i| table.columns[i].clone())
            .collect(),
        column_kinds: kinds,
        records,
        labels: Array1::from_vec(labels),
    })
}

fn detect_kind(values: &[&str]) -> ColumnKind {
    let non_empty = values.iter().filter(|v| !v.is_empty());
    if non_empty.clone().all(|v| v.parse::<f64>().is_ok()) {
        return ColumnKind::Numeric;
    }
    if non_empty.clone().all(|v| parse_bool(v).is_some()) {
        return ColumnKind::Boolean;
    }
    let mut levels = BTreeMap::new();
    for v in values {
        levels.entry(v.to_string()).or_insert(0);
    }
    for (code, slot) in levels.values_mut().enumerate() {
        *slot = code;
    }
    ColumnKind::Categorical(levels)
}

fn encode_column(values: &[&str], kind: &ColumnKind) -> Vec<f64> {
    values
        .iter()
        .map(|v| match kind {
            ColumnKind::Numeric => v
                .parse::<f64>()
                .ok()
                .filter(|x| x.is_finite())
                .unwrap_or(0.0),
            ColumnKind::Boolean => match parse_bool(v) {
                Some(true) => 1.0,
                _ => 0.0,
            },
            ColumnKind::Categorical(levels) => levels.get(*v).copied().unwrap_or(0) as f64,
        })
        .collect()
}

fn parse_bool(v: &str) -> Option<bool> {
    if v.eq_ignore_ascii_case("true") {
        Some(true)
    } else if v.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
