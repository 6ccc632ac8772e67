use burn::nn::Initializer;
use burn::prelude::Backend;

use lottery_core::desc::LotteryDesc;
use lottery_core::shape::ImageShape;

use crate::error::ModelError;
use crate::plan::{self, ChannelPlan};
use crate::simplecnn::{SimpleCnn, SimpleCnnConfig};

pub const DEFAULT_OUTPUTS: usize = 10;

/// A family of simple CNNs whose members are named `<PREFIX>_<N1>[_<N2>...]`.
pub trait ModelFamily {
    /// The `<domain>_<architecture>` part of every member name.
    const PREFIX: &'static str;
    /// Shape of the images the family is built for.
    const INPUT: ImageShape;

    fn default_hparams() -> LotteryDesc;

    fn is_valid_model_name(model_name: &str) -> bool {
        plan::is_valid_model_name(Self::PREFIX, model_name)
    }

    fn config_from_name(
        model_name: &str,
        initializer: Initializer,
        outputs: Option<usize>,
    ) -> Result<SimpleCnnConfig, ModelError> {
        let plan = ChannelPlan::parse(Self::PREFIX, model_name)?;
        Ok(SimpleCnnConfig::new(plan, Self::INPUT, initializer)
            .with_outputs(outputs.filter(|&n| n > 0).unwrap_or(DEFAULT_OUTPUTS)))
    }

    /// Builds the member named `model_name`; a missing or zero `outputs` means ten classes.
    fn get_model_from_name<B: Backend>(
        model_name: &str,
        initializer: Initializer,
        outputs: Option<usize>,
        device: &B::Device,
    ) -> Result<SimpleCnn<B>, ModelError> {
        Self::config_from_name(model_name, initializer, outputs)?.init(device)
    }
}
