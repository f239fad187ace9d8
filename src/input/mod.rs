use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod encode;
pub mod open;
pub mod predictions;

use crate::model::metrics::ClassLabel;
use open::open_maybe_gz;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("CSV error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("schema mismatch: {0}")]
    Schema(String),
    #[error("invalid label {value:?} in {origin}, row {row}")]
    InvalidLabel {
        origin: String,
        row: usize,
        value: String,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Raw string cells of one CSV table, header order preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledTable {
    pub origin: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl LabeledTable {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Reads a CSV (optionally gzip-compressed) table as raw string cells.
pub fn read_table(path: &Path) -> Result<LabeledTable, InputError> {
    if !path.is_file() {
        return Err(InputError::MissingInput(format!(
            "{} does not exist or is not a file",
            path.display()
        )));
    }
    let reader = open_maybe_gz(path)?;
    let csv_err = |source| InputError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: Vec<String> = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|s| s.to_string())
        .collect();
    let mut seen = HashSet::new();
    for name in &columns {
        if !seen.insert(name.as_str()) {
            return Err(InputError::Schema(format!(
                "duplicate column {name:?} in {}",
                path.display()
            )));
        }
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(csv_err)?;
        rows.push(record.iter().map(|s| s.to_string()).collect::<Vec<_>>());
    }
    if rows.is_empty() {
        tracing::warn!(path = %path.display(), "table has no data rows");
    }

    tracing::info!(
        path = %path.display(),
        rows = rows.len(),
        columns = columns.len(),
        "loaded table"
    );
    Ok(LabeledTable {
        origin: path.display().to_string(),
        columns,
        rows,
    })
}

/// Reads a table holding one class of messages.
///
/// Tables without `label_column` receive `default_label` on every row.
pub fn load_labeled_table(
    path: &Path,
    label_column: &str,
    default_label: ClassLabel,
) -> Result<LabeledTable, InputError> {
    let mut table = read_table(path)?;
    if table.column_index(label_column).is_none() {
        tracing::info!(
            path = %path.display(),
            label = default_label,
            "no {label_column} column; labelling every row from its source"
        );
        table.columns.push(label_column.to_string());
        for row in &mut table.rows {
            row.push(default_label.to_string());
        }
    }
    Ok(table)
}

/// Drops exact duplicate rows, keeping the first occurrence. Returns the number removed.
pub fn dedup_rows(table: &mut LabeledTable) -> usize {
    let before = table.rows.len();
    let mut seen: HashSet<Vec<String>> = HashSet::with_capacity(before);
    table.rows.retain(|row| seen.insert(row.clone()));
    before - table.rows.len()
}

/// Appends `second` below `first`, matching columns by name.
pub fn concat_tables(first: LabeledTable, second: LabeledTable) -> Result<LabeledTable, InputError> {
    let mut mapping = Vec::with_capacity(first.columns.len());
    for name in &first.columns {
        match second.column_index(name) {
            Some(idx) => mapping.push(idx),
            None => {
                return Err(InputError::Schema(format!(
                    "column {name:?} is in {} but not in {}",
                    first.origin, second.origin
                )));
            }
        }
    }
    if second.columns.len() != first.columns.len() {
        let extra: Vec<&str> = second
            .columns
            .iter()
            .filter(|c| first.column_index(c).is_none())
            .map(|c| c.as_str())
            .collect();
        return Err(InputError::Schema(format!(
            "columns {extra:?} are in {} but not in {}",
            second.origin, first.origin
        )));
    }

    let origin = format!("{} + {}", first.origin, second.origin);
    let mut rows = first.rows;
    rows.reserve(second.rows.len());
    for row in second.rows {
        rows.push(mapping.iter().map(|&idx| row[idx].clone()).collect());
    }
    Ok(LabeledTable {
        origin,
        columns: first.columns,
        rows,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
