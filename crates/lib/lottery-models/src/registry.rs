use std::fmt::{Display, Formatter};
use std::str::FromStr;

use burn::prelude::Backend;
use log::info;

use lottery_core::desc::LotteryDesc;
use lottery_core::hparams::ModelHparams;
use lottery_core::shape::ImageShape;

use crate::error::ModelError;
use crate::family::ModelFamily;
use crate::init::initializer_from_name;
use crate::mnist_simplecnn::MnistSimpleCnn;
use crate::simplecnn::{SimpleCnn, SimpleCnnConfig};
use crate::svhn_simplecnn::SvhnSimpleCnn;

/// Every model family that can be named in a hyperparameter bundle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegisteredModel {
    MnistSimpleCnn,
    SvhnSimpleCnn,
}

impl RegisteredModel {
    pub const ALL: [RegisteredModel; 2] =
        [RegisteredModel::MnistSimpleCnn, RegisteredModel::SvhnSimpleCnn];

    /// The family whose grammar accepts `model_name`, if any.
    pub fn for_name(model_name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|family| family.is_valid_model_name(model_name))
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            RegisteredModel::MnistSimpleCnn => MnistSimpleCnn::PREFIX,
            RegisteredModel::SvhnSimpleCnn => SvhnSimpleCnn::PREFIX,
        }
    }

    pub fn input_shape(&self) -> ImageShape {
        match self {
            RegisteredModel::MnistSimpleCnn => MnistSimpleCnn::INPUT,
            RegisteredModel::SvhnSimpleCnn => SvhnSimpleCnn::INPUT,
        }
    }

    pub fn is_valid_model_name(&self, model_name: &str) -> bool {
        match self {
            RegisteredModel::MnistSimpleCnn => MnistSimpleCnn::is_valid_model_name(model_name),
            RegisteredModel::SvhnSimpleCnn => SvhnSimpleCnn::is_valid_model_name(model_name),
        }
    }

    pub fn default_hparams(&self) -> LotteryDesc {
        match self {
            RegisteredModel::MnistSimpleCnn => MnistSimpleCnn::default_hparams(),
            RegisteredModel::SvhnSimpleCnn => SvhnSimpleCnn::default_hparams(),
        }
    }

    fn config_from_hparams(
        &self,
        model_hparams: &ModelHparams,
        outputs: Option<usize>,
    ) -> Result<SimpleCnnConfig, ModelError> {
        let initializer = initializer_from_name(&model_hparams.model_init)?;
        let name = &model_hparams.model_name;
        match self {
            RegisteredModel::MnistSimpleCnn => {
                MnistSimpleCnn::config_from_name(name, initializer, outputs)
            }
            RegisteredModel::SvhnSimpleCnn => {
                SvhnSimpleCnn::config_from_name(name, initializer, outputs)
            }
        }
    }
}

impl FromStr for RegisteredModel {
    type Err = ModelError;

    /// Accepts a family prefix such as `mnist_simplecnn` or any valid member name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|family| family.prefix() == s)
            .or_else(|| Self::for_name(s))
            .ok_or_else(|| ModelError::InvalidModelName(s.to_owned()))
    }
}

impl Display for RegisteredModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

pub fn exists(model_name: &str) -> bool {
    RegisteredModel::for_name(model_name).is_some()
}

/// Resolves the model configuration named by the hyperparameters without allocating weights.
pub fn config(
    model_hparams: &ModelHparams,
    outputs: Option<usize>,
) -> Result<SimpleCnnConfig, ModelError> {
    let family = RegisteredModel::for_name(&model_hparams.model_name)
        .ok_or_else(|| ModelError::InvalidModelName(model_hparams.model_name.clone()))?;
    family.config_from_hparams(model_hparams, outputs)
}

/// Builds and initializes the model named by the hyperparameters.
pub fn get<B: Backend>(
    model_hparams: &ModelHparams,
    outputs: Option<usize>,
    device: &B::Device,
) -> Result<SimpleCnn<B>, ModelError> {
    let model = config(model_hparams, outputs)?.init(device)?;
    info!(
        "Initialized {} with {}",
        model_hparams.model_name, model_hparams.model_init
    );
    Ok(model)
}

/// The family defaults for `model_name`, renamed to it.
pub fn get_default_hparams(model_name: &str) -> Result<LotteryDesc, ModelError> {
    let family = RegisteredModel::for_name(model_name)
        .ok_or_else(|| ModelError::InvalidModelName(model_name.to_owned()))?;
    let mut desc = family.default_hparams();
    desc.model_hparams.model_name = model_name.to_owned();
    Ok(desc)
}
