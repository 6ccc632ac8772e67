use lottery_core::desc::LotteryDesc;
use lottery_core::hparams::{DatasetHparams, ModelHparams, PruningHparams, TrainingHparams};
use lottery_core::shape::ImageShape;
use lottery_data::dataset::ImageDataset;
use lottery_data::mnist::MnistImages;

use crate::family::ModelFamily;

/// Simple CNNs over 28x28 grayscale MNIST digits.
#[derive(Clone, Copy, Debug, Default)]
pub struct MnistSimpleCnn;

impl ModelFamily for MnistSimpleCnn {
    const PREFIX: &'static str = "mnist_simplecnn";
    const INPUT: ImageShape = MnistImages::SHAPE;

    fn default_hparams() -> LotteryDesc {
        let model_hparams = ModelHparams::builder()
            .model_name("mnist_simplecnn_16_32")
            .model_init("kaiming_normal")
            .batchnorm_init("uniform")
            .build();

        let dataset_hparams = DatasetHparams::builder()
            .dataset_name(MnistImages::NAME)
            .batch_size(128)
            .build();

        let training_hparams = TrainingHparams::builder()
            .optimizer_name("adam")
            .lr(5e-2)
            .training_steps("3ep")
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
