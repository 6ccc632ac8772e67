use burn::data::dataloader::batcher::Batcher;
use burn::prelude::Backend;
use burn::tensor::{ElementConversion, Int, Shape, Tensor, TensorData};

use lottery_core::shape::ImageShape;

use crate::dataset::ImageItem;
use crate::normalize::Normalizer;

#[derive(Clone, Debug)]
pub struct ImageBatch<B: Backend> {
    /// `[batch, channels, height, width]`, normalized.
    pub images: Tensor<B, 4>,
    pub targets: Tensor<B, 1, Int>,
}

/// Stacks raw channels-last examples into normalized channels-first batches.
#[derive(Clone)]
pub struct ImageBatcher<B: Backend> {
    device: B::Device,
    shape: ImageShape,
    normalizer: Normalizer<B>,
}

impl<B: Backend> ImageBatcher<B> {
    pub fn new(device: B::Device, shape: ImageShape, normalizer: Normalizer<B>) -> Self {
        Self {
            device,
            shape,
            normalizer,
        }
    }

    pub fn shape(&self) -> ImageShape {
        self.shape
    }
}

impl<B: Backend> Batcher<ImageItem, ImageBatch<B>> for ImageBatcher<B> {
    fn batch(&self, items: Vec<ImageItem>) -> ImageBatch<B> {
        let targets = items
            .iter()
            .map(|item| {
                Tensor::<B, 1, Int>::from_data(
                    TensorData::from([(item.label as i64).elem::<B::IntElem>()]),
                    &self.device,
                )
            })
            .collect();

        let dims = [self.shape.height, self.shape.width, self.shape.channels];
        let images = items
            .into_iter()
            .map(|item| TensorData::new(item.pixels, Shape::new(dims)))
            .map(|data| {
                Tensor::<B, 3>::from_data(data.convert::<B::FloatElem>(), &self.device)
                    .swap_dims(2, 1) // [H, C, W]
                    .swap_dims(1, 0) // [C, H, W]
            })
            .map(|tensor| tensor / 255)
            .collect();

        let images = Tensor::stack(images, 0);
        let targets = Tensor::cat(targets, 0);

        let images = self.normalizer.normalize(images);

        ImageBatch { images, targets }
    }
}
