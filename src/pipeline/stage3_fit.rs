use crate::classifier::{ModelError, build_classifier};
use crate::model::metrics::ClassLabel;
use crate::model::partition::Partition;
use crate::model::profile::{ModelKind, ModelParams};
use crate::pipeline::stage2_split::SplitData;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPredictions {
    pub model: &'static str,
    pub train: Vec<ClassLabel>,
    pub test: Vec<ClassLabel>,
}

impl ModelPredictions {
    pub fn for_partition(&self, partition: Partition) -> &[ClassLabel] {
        match partition {
            Partition::Train => &self.train,
            Partition::Test => &self.test,
        }
    }
}

/// Fits every requested model on the training partition and predicts both partitions.
pub fn run_stage3(
    split: &SplitData,
    models: &[ModelKind],
    params: &ModelParams,
) -> Result<Vec<ModelPredictions>, ModelError> {
    let mut out = Vec::with_capacity(models.len());
    for &kind in models {
        let mut classifier = build_classifier(kind, params);
        tracing::info!(model = classifier.name(), "fitting");
        classifier.fit(&split.train.records, &split.train.labels)?;
        let train = classifier.predict(&split.train.records)?;
        let test = classifier.predict(&split.test.records)?;
        out.push(ModelPredictions {
            model: classifier.name(),
            train,
            test,
        });
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_fit.rs"]
mod tests;
