use std::path::Path;

use crate::input::encode::parse_class_token;
use crate::input::{InputError, LabeledTable, read_table};
use crate::model::metrics::ClassLabel;

/// Aligned truth / prediction columns from a table produced outside this tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionTable {
    pub origin: String,
    pub y_true: Vec<ClassLabel>,
    pub y_pred: Vec<ClassLabel>,
}

pub fn load_predictions(
    path: &Path,
    true_column: &str,
    pred_column: &str,
) -> Result<PredictionTable, InputError> {
    let table = read_table(path)?;
    let true_idx = required_column(&table, true_column)?;
    let pred_idx = required_column(&table, pred_column)?;

    let mut y_true = Vec::with_capacity(table.n_rows());
    let mut y_pred = Vec::with_capacity(table.n_rows());
    for (row_no, row) in table.rows.iter().enumerate() {
        y_true.push(parse_cell(&table.origin, row_no, &row[true_idx])?);
        y_pred.push(parse_cell(&table.origin, row_no, &row[pred_idx])?);
    }
    Ok(PredictionTable {
        origin: table.origin,
        y_true,
        y_pred,
    })
}

fn required_column(table: &LabeledTable, name: &str) -> Result<usize, InputError> {
    table
        .column_index(name)
        .ok_or_else(|| InputError::Schema(format!("{} has no {name:?} column", table.origin)))
}

fn parse_cell(origin: &str, row_no: usize, raw: &str) -> Result<ClassLabel, InputError> {
    parse_class_token(raw).ok_or_else(|| InputError::InvalidLabel {
        origin: origin.to_string(),
        row: row_no + 1,
        value: raw.to_string(),
    })
}
