use lottery_core::desc::LotteryDesc;
use lottery_core::hparams::{DatasetHparams, ModelHparams, PruningHparams, TrainingHparams};
use lottery_core::shape::ImageShape;
use lottery_data::dataset::ImageDataset;
use lottery_data::svhn::SvhnImages;

use crate::family::ModelFamily;

/// Simple CNNs over 32x32 RGB SVHN crops.
#[derive(Clone, Copy, Debug, Default)]
pub struct SvhnSimpleCnn;

impl ModelFamily for SvhnSimpleCnn {
    const PREFIX: &'static str = "svhn_simplecnn";
    const INPUT: ImageShape = SvhnImages::SHAPE;

    fn default_hparams() -> LotteryDesc {
        let model_hparams = ModelHparams::builder()
            .model_name("svhn_simplecnn_16_32")
            .model_init("kaiming_normal")
            .batchnorm_init("uniform")
            .build();

        let dataset_hparams = DatasetHparams::builder()
            .dataset_name(SvhnImages::NAME)
            .batch_size(128)
            .build();

        let training_hparams = TrainingHparams::builder()
            .optimizer_name("adam")
            .lr(1e-2)
            .training_steps("5ep")
            .build();

        let pruning_hparams = PruningHparams::builder()
            .pruning_strategy("sparse_global")
            .pruning_fraction(0.2)
            .pruning_layers_to_ignore("")
            .build();

        LotteryDesc::new(
            model_hparams,
            dataset_hparams,
            training_hparams,
            pruning_hparams,
        )
    }
}
