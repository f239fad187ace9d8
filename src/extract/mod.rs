//! Header feature extraction for raw e-mail messages.
//!
//! Each message yields a [`Featureset`] written as `<file>.features.json` beside it. The
//! optional flattened table has one row per message plus `Fname` and `Label` columns, and can
//! be fed straight back into `run`.

pub mod address;
pub mod features;
pub mod headers;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::model::metrics::ClassLabel;
pub use features::{Featureset, extract_features};
use headers::parse_headers;

pub const FEATURES_SUFFIX: &str = ".features.json";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("CSV error writing {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
    #[error("failed to serialise features for {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("message has no header fields")]
    NoHeaders,
}

#[derive(Debug, Clone)]
pub struct ExtractParams<'a> {
    pub input: &'a Path,
    pub table: Option<&'a Path>,
    pub label: ClassLabel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractStats {
    pub messages: usize,
    pub extracted: usize,
    pub skipped: usize,
}

/// Extracts features from one message file or every message file directly inside a directory.
pub fn run_extract(params: &ExtractParams<'_>) -> Result<ExtractStats, ExtractError> {
    let files = list_messages(params.input)?;
    let mut stats = ExtractStats {
        messages: files.len(),
        ..ExtractStats::default()
    };
    let mut rows: Vec<(String, Featureset)> = Vec::with_capacity(files.len());

    for path in &files {
        match extract_file(path) {
            Ok(features) => {
                write_features_json(path, &features)?;
                rows.push((file_name(path), features));
                stats.extracted += 1;
            }
            Err(ExtractError::NoHeaders) => {
                tracing::warn!(path = %path.display(), "cannot parse message, skipping");
                stats.skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    if let Some(table) = params.table {
        write_table(table, &rows, params.label)?;
        tracing::info!(path = %table.display(), rows = rows.len(), "feature table written");
    }
    tracing::info!(
        messages = stats.messages,
        extracted = stats.extracted,
        skipped = stats.skipped,
        "extraction finished"
    );
    Ok(stats)
}

pub fn extract_file(path: &Path) -> Result<Featureset, ExtractError> {
    let bytes = fs::read(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    let headers = parse_headers(&text)?;
    Ok(extract_features(&headers))
}

/// Sorted message files; feature files written by earlier runs and subdirectories are left out.
pub fn list_messages(input: &Path) -> Result<Vec<PathBuf>, ExtractError> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(ExtractError::MissingInput(format!(
            "{} does not exist",
            input.display()
        )));
    }
    let io_err = |source| ExtractError::Io {
        path: input.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(input).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && !file_name(&path).ends_with(FEATURES_SUFFIX) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub fn features_path(message: &Path) -> PathBuf {
    let mut name = message.as_os_str().to_os_string();
    name.push(FEATURES_SUFFIX);
    PathBuf::from(name)
}

fn write_features_json(message: &Path, features: &Featureset) -> Result<(), ExtractError> {
    let path = features_path(message);
    let json = serde_json::to_string_pretty(features).map_err(|source| ExtractError::Json {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, json).map_err(|source| ExtractError::Io { path, source })
}

fn write_table(
    path: &Path,
    rows: &[(String, Featureset)],
    label: ClassLabel,
) -> Result<(), ExtractError> {
    let csv_err = |source| ExtractError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    let mut header = vec!["Fname"];
    header.extend(features::TABLE_COLUMNS);
    header.push("Label");
    writer.write_record(&header).map_err(csv_err)?;

    let label = label.to_string();
    for (fname, features) in rows {
        let mut record = vec![fname.clone()];
        record.extend(features::flatten(features));
        record.push(label.clone());
        writer.write_record(&record).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "../../tests/src_inline/extract/tests.rs"]
mod tests;
