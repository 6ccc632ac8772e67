use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::HparamsError;
use crate::step::{parse_step_str, Step};

pub const SUPPORTED_OPTIMIZERS: [&str; 2] = ["sgd", "adam"];
pub const SUPPORTED_PRUNING_STRATEGIES: [&str; 1] = ["sparse_global"];

/// Which architecture to build and how to initialize it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, TypedBuilder)]
pub struct ModelHparams {
    #[builder(setter(into))]
    pub model_name: String,
    #[builder(setter(into))]
    pub model_init: String,
    #[builder(setter(into))]
    pub batchnorm_init: String,
    #[serde(default)]
    #[builder(default)]
    pub batchnorm_frozen: bool,
    #[serde(default)]
    #[builder(default)]
    pub output_frozen: bool,
    #[serde(default)]
    #[builder(default)]
    pub others_frozen: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, TypedBuilder)]
pub struct DatasetHparams {
    #[builder(setter(into))]
    pub dataset_name: String,
    pub batch_size: usize,
    #[serde(default)]
    #[builder(default)]
    pub do_not_augment: bool,
    #[serde(default)]
    #[builder(default, setter(strip_option))]
    pub transformation_seed: Option<u64>,
    #[serde(default)]
    #[builder(default, setter(strip_option))]
    pub subsample_fraction: Option<f64>,
    #[serde(default)]
    #[builder(default, setter(strip_option))]
    pub random_labels_fraction: Option<f64>,
}

impl DatasetHparams {
    pub fn seed(&self) -> u64 {
        self.transformation_seed.unwrap_or(0)
    }

    pub(crate) fn validate(&self) -> Result<(), HparamsError> {
        if self.batch_size == 0 {
            return Err(HparamsError::OutOfRange {
                name: "batch_size",
                range: "[1, inf)",
                value: 0.0,
            });
        }
        check_fraction("subsample_fraction", self.subsample_fraction)?;
        check_fraction("random_labels_fraction", self.random_labels_fraction)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, TypedBuilder)]
pub struct TrainingHparams {
    #[builder(setter(into))]
    pub optimizer_name: String,
    pub lr: f64,
    /// Step string such as `3ep` or `2ep40it`.
    #[builder(setter(into))]
    pub training_steps: String,
    #[serde(default)]
    #[builder(default, setter(strip_option))]
    pub data_order_seed: Option<u64>,
    #[serde(default)]
    #[builder(default)]
    pub momentum: f64,
    /// Comma-separated step strings at which the learning rate drops by `gamma`.
    #[serde(default)]
    #[builder(default, setter(strip_option, into))]
    pub milestone_steps: Option<String>,
    #[serde(default)]
    #[builder(default, setter(strip_option))]
    pub gamma: Option<f64>,
    #[serde(default)]
    #[builder(default, setter(strip_option, into))]
    pub warmup_steps: Option<String>,
    #[serde(default)]
    #[builder(default, setter(strip_option))]
    pub weight_decay: Option<f64>,
}

impl TrainingHparams {
    pub fn milestone_strs(&self) -> Vec<&str> {
        split_list(self.milestone_steps.as_deref().unwrap_or_default())
    }

    pub(crate) fn validate(&self) -> Result<(), HparamsError> {
        let optimizer = self.optimizer_name.to_lowercase();
        if !SUPPORTED_OPTIMIZERS.contains(&optimizer.as_str()) {
            return Err(HparamsError::UnknownOptimizer(self.optimizer_name.clone()));
        }
        if !(self.lr > 0.0) {
            return Err(HparamsError::OutOfRange {
                name: "lr",
                range: "(0, inf)",
                value: self.lr,
            });
        }
        check_step("training_steps", &self.training_steps)?;
        if let Some(warmup) = &self.warmup_steps {
            check_step("warmup_steps", warmup)?;
        }
        for milestone in self.milestone_strs() {
            check_step("milestone_steps", milestone)?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, TypedBuilder)]
pub struct PruningHparams {
    #[builder(setter(into))]
    pub pruning_strategy: String,
    pub pruning_fraction: f64,
    /// Comma-separated parameter names that the pruning pass leaves untouched.
    #[serde(default)]
    #[builder(default, setter(into))]
    pub pruning_layers_to_ignore: String,
}

impl PruningHparams {
    pub fn layers_to_ignore(&self) -> Vec<&str> {
        split_list(&self.pruning_layers_to_ignore)
    }

    pub(crate) fn validate(&self) -> Result<(), HparamsError> {
        if !SUPPORTED_PRUNING_STRATEGIES.contains(&self.pruning_strategy.as_str()) {
            return Err(HparamsError::UnknownPruningStrategy(
                self.pruning_strategy.clone(),
            ));
        }
        if !(self.pruning_fraction > 0.0 && self.pruning_fraction < 1.0) {
            return Err(HparamsError::OutOfRange {
                name: "pruning_fraction",
                range: "(0, 1)",
                value: self.pruning_fraction,
            });
        }
        Ok(())
    }
}

pub(crate) fn split_list(list: &str) -> Vec<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

fn check_step(field: &'static str, step: &str) -> Result<(), HparamsError> {
    parse_step_str(step)
        .map(|_| ())
        .map_err(|source| HparamsError::Step { field, source })
}

fn check_fraction(name: &'static str, fraction: Option<f64>) -> Result<(), HparamsError> {
    match fraction {
        Some(value) if !(value > 0.0 && value <= 1.0) => Err(HparamsError::OutOfRange {
            name,
            range: "(0, 1]",
            value,
        }),
        _ => Ok(()),
    }
}

pub(crate) fn parse_step(
    field: &'static str,
    step: &str,
    iterations_per_epoch: u64,
) -> Result<Step, HparamsError> {
    Step::from_step_str(step, iterations_per_epoch)
        .map_err(|source| HparamsError::Step { field, source })
}
