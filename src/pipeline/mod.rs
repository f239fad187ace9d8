use thiserror::Error;

use crate::classifier::ModelError;
use crate::input::InputError;
use crate::scoring::ScoreError;

pub mod stage1_load;
pub mod stage2_split;
pub mod stage3_fit;
pub mod stage4_score;
pub mod stage5_report;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("failed to serialise report: {0}")]
    Json(#[from] serde_json::Error),
}
