use std::path::Path;

use serde::Serialize;

use crate::input::{InputError, LabeledTable, concat_tables, dedup_rows, load_labeled_table};
use crate::model::metrics::{HAM, SPAM};

#[derive(Debug, Clone)]
pub struct Stage1Params<'a> {
    pub ham_path: &'a Path,
    pub spam_path: &'a Path,
    pub label_column: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub ham_rows: usize,
    pub spam_rows: usize,
    pub ham_duplicates: usize,
    pub spam_duplicates: usize,
}

#[derive(Debug)]
pub struct Stage1Output {
    pub table: LabeledTable,
    pub stats: LoadStats,
}

/// Loads both class tables, deduplicates each one and stacks ham above spam.
pub fn run_stage1(params: &Stage1Params<'_>) -> Result<Stage1Output, InputError> {
    let mut ham = load_labeled_table(params.ham_path, params.label_column, HAM)?;
    let mut spam = load_labeled_table(params.spam_path, params.label_column, SPAM)?;

    let ham_duplicates = dedup_rows(&mut ham);
    let spam_duplicates = dedup_rows(&mut spam);
    if ham_duplicates + spam_duplicates > 0 {
        tracing::info!(
            ham = ham_duplicates,
            spam = spam_duplicates,
            "dropped duplicate rows"
        );
    }

    let stats = LoadStats {
        ham_rows: ham.n_rows(),
        spam_rows: spam.n_rows(),
        ham_duplicates,
        spam_duplicates,
    };
    let table = concat_tables(ham, spam)?;
    if table.rows.is_empty() {
        return Err(InputError::InvalidInput(
            "ham and spam tables are both empty".to_string(),
        ));
    }
    Ok(Stage1Output { table, stats })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_load.rs"]
mod tests;
