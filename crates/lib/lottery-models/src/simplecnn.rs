use burn::config::Config;
use burn::module::Module;
use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::loss::{CrossEntropyLoss, CrossEntropyLossConfig};
use burn::nn::pool::{AvgPool2d, AvgPool2dConfig};
use burn::nn::{Initializer, Linear, LinearConfig, PaddingConfig2d, Relu};
use burn::prelude::*;
use burn::tensor::backend::AutodiffBackend;
use burn::train::{ClassificationOutput, TrainOutput, TrainStep, ValidStep};
use log::debug;

use lottery_core::shape::ImageShape;
use lottery_data::batcher::ImageBatch;

use crate::error::ModelError;
use crate::plan::ChannelPlan;

pub const OUTPUT_LAYER_NAMES: [&str; 2] = ["fc.weight", "fc.bias"];

#[derive(Config, Debug)]
pub struct SimpleCnnConfig {
    pub plan: ChannelPlan,
    pub input: ImageShape,
    pub initializer: Initializer,
    #[config(default = 10)]
    pub outputs: usize,
}

impl SimpleCnnConfig {
    /// Width of the flattened activations that feed the output layer.
    ///
    /// Every stage halves the spatial size, rounding down.
    pub fn feature_count(&self) -> Result<usize, ModelError> {
        let stages = self.plan.stages();
        let (mut height, mut width) = (self.input.height, self.input.width);
        for _ in 0..stages {
            height /= 2;
            width /= 2;
        }
        if height == 0 || width == 0 {
            return Err(ModelError::InputTooSmall {
                height: self.input.height,
                width: self.input.width,
                stages,
            });
        }
        Ok(height * width * self.plan.last_width())
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<SimpleCnn<B>, ModelError> {
        let features = self.feature_count()?;

        let mut in_channels = self.input.channels;
        let mut conv_layers = Vec::with_capacity(self.plan.stages());
        for &out_channels in self.plan.widths() {
            let conv = Conv2dConfig::new([in_channels, out_channels], [3, 3])
                .with_stride([1, 1])
                .with_padding(PaddingConfig2d::Explicit(1, 1))
                .with_initializer(self.initializer.clone())
                .init(device);
            conv_layers.push(conv);
            in_channels = out_channels;
        }

        let fc = LinearConfig::new(features, self.outputs)
            .with_initializer(self.initializer.clone())
            .init(device);

        debug!(
            "Built a simple CNN with widths {} on {} input, {} features, {} outputs",
            self.plan, self.input, features, self.outputs
        );
        Ok(SimpleCnn {
            conv_layers,
            pool: AvgPool2dConfig::new([2, 2]).with_strides([2, 2]).init(),
            activation: Relu::new(),
            fc,
            input_height: self.input.height,
            input_width: self.input.width,
        })
    }
}

/// Stacked 3x3 convolutions, each followed by ReLU and 2x2 average pooling, then one linear
/// output layer.
#[derive(Module, Debug)]
pub struct SimpleCnn<B: Backend> {
    conv_layers: Vec<Conv2d<B>>,
    pool: AvgPool2d,
    activation: Relu,
    fc: Linear<B>,
    input_height: usize,
    input_width: usize,
}

impl<B: Backend> SimpleCnn<B> {
    /// Runs the network on `[batch, channels, height, width]` images.
    ///
    /// Fails when the images do not have the shape the model was built for, or when the
    /// flattened activations disagree with the output layer.
    pub fn try_forward(&self, images: Tensor<B, 4>) -> Result<Tensor<B, 2>, ModelError> {
        let [_, channels, height, width] = images.dims();
        let expected = self.input_shape();
        let expected = [expected.channels, expected.height, expected.width];
        if [channels, height, width] != expected {
            return Err(ModelError::InputShape {
                expected,
                actual: [channels, height, width],
            });
        }

        let mut x = images;
        for conv in &self.conv_layers {
            x = self.activation.forward(conv.forward(x));
            x = self.pool.forward(x);
        }

        let x: Tensor<B, 2> = x.flatten(1, 3);
        let [_, features] = x.dims();
        let expected = self.fc_input_features();
        if features != expected {
            return Err(ModelError::ShapeMismatch {
                expected,
                actual: features,
            });
        }
        Ok(self.fc.forward(x))
    }

    /// # Panics
    ///
    /// On any error [`SimpleCnn::try_forward`] would report.
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        match self.try_forward(images) {
            Ok(output) => output,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn forward_classification(
        &self,
        images: Tensor<B, 4>,
        targets: Tensor<B, 1, Int>,
    ) -> ClassificationOutput<B> {
        let output = self.forward(images);
        let loss = self
            .loss_criterion()
            .forward(output.clone(), targets.clone());

        ClassificationOutput::new(loss, output, targets)
    }

    pub fn loss_criterion(&self) -> CrossEntropyLoss<B> {
        CrossEntropyLossConfig::new().init(&self.fc.weight.val().device())
    }

    pub fn output_layer_names(&self) -> Vec<String> {
        OUTPUT_LAYER_NAMES.iter().map(|name| name.to_string()).collect()
    }

    /// Weight tensors a pruning pass may mask: every conv kernel and the output weight.
    pub fn prunable_layer_names(&self) -> Vec<String> {
        (0..self.conv_layers.len())
            .map(|index| format!("conv_layers.{index}.weight"))
            .chain(std::iter::once(OUTPUT_LAYER_NAMES[0].to_string()))
            .collect()
    }

    /// Parameter names and shapes in construction order.
    pub fn parameter_shapes(&self) -> Vec<(String, Vec<usize>)> {
        let mut shapes = Vec::new();
        for (index, conv) in self.conv_layers.iter().enumerate() {
            shapes.push((
                format!("conv_layers.{index}.weight"),
                conv.weight.val().dims().to_vec(),
            ));
            if let Some(bias) = &conv.bias {
                shapes.push((
                    format!("conv_layers.{index}.bias"),
                    bias.val().dims().to_vec(),
                ));
            }
        }
        shapes.push((
            OUTPUT_LAYER_NAMES[0].to_string(),
            self.fc.weight.val().dims().to_vec(),
        ));
        if let Some(bias) = &self.fc.bias {
            shapes.push((OUTPUT_LAYER_NAMES[1].to_string(), bias.val().dims().to_vec()));
        }
        shapes
    }

    /// Output widths of the conv stages, read back from the kernels.
    pub fn channel_widths(&self) -> Vec<usize> {
        self.conv_layers
            .iter()
            .map(|conv| conv.weight.val().dims()[0])
            .collect()
    }

    pub fn input_shape(&self) -> ImageShape {
        let channels = self
            .conv_layers
            .first()
            .map(|conv| conv.weight.val().dims()[1])
            .unwrap_or_default();
        ImageShape::new(self.input_height, self.input_width, channels)
    }

    pub fn fc_input_features(&self) -> usize {
        self.fc.weight.val().dims()[0]
    }

    pub fn num_outputs(&self) -> usize {
        self.fc.weight.val().dims()[1]
    }
}

impl<B: AutodiffBackend> TrainStep<ImageBatch<B>, ClassificationOutput<B>> for SimpleCnn<B> {
    fn step(&self, batch: ImageBatch<B>) -> TrainOutput<ClassificationOutput<B>> {
        let item = self.forward_classification(batch.images, batch.targets);

        TrainOutput::new(self, item.loss.backward(), item)
    }
}

impl<B: Backend> ValidStep<ImageBatch<B>, ClassificationOutput<B>> for SimpleCnn<B> {
    fn step(&self, batch: ImageBatch<B>) -> ClassificationOutput<B> {
        self.forward_classification(batch.images, batch.targets)
    }
}
