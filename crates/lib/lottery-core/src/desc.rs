use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::HparamsError;
use crate::hparams::{parse_step, DatasetHparams, ModelHparams, PruningHparams, TrainingHparams};
use crate::step::Step;

/// Everything the training and pruning driver needs to run one lottery ticket experiment.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, TypedBuilder)]
pub struct LotteryDesc {
    pub model_hparams: ModelHparams,
    pub dataset_hparams: DatasetHparams,
    pub training_hparams: TrainingHparams,
    pub pruning_hparams: PruningHparams,
}

impl LotteryDesc {
    pub fn new(
        model_hparams: ModelHparams,
        dataset_hparams: DatasetHparams,
        training_hparams: TrainingHparams,
        pruning_hparams: PruningHparams,
    ) -> Self {
        Self {
            model_hparams,
            dataset_hparams,
            training_hparams,
            pruning_hparams,
        }
    }

    /// Checks the parts of the bundle that do not depend on a model or dataset registry.
    pub fn validate(&self) -> Result<(), HparamsError> {
        self.dataset_hparams.validate()?;
        self.training_hparams.validate()?;
        self.pruning_hparams.validate()
    }

    pub fn end_step(&self, iterations_per_epoch: u64) -> Result<Step, HparamsError> {
        parse_step(
            "training_steps",
            &self.training_hparams.training_steps,
            iterations_per_epoch,
        )
    }

    pub fn warmup_step(&self, iterations_per_epoch: u64) -> Result<Option<Step>, HparamsError> {
        self.training_hparams
            .warmup_steps
            .as_deref()
            .map(|warmup| parse_step("warmup_steps", warmup, iterations_per_epoch))
            .transpose()
    }

    pub fn milestones(&self, iterations_per_epoch: u64) -> Result<Vec<Step>, HparamsError> {
        self.training_hparams
            .milestone_strs()
            .into_iter()
            .map(|milestone| parse_step("milestone_steps", milestone, iterations_per_epoch))
            .collect()
    }

    pub fn to_toml(&self) -> Result<String, HparamsError> {
        Ok(toml::to_string(self)?)
    }

    pub fn from_toml(contents: &str) -> Result<Self, HparamsError> {
        Ok(toml::from_str(contents)?)
    }
}
