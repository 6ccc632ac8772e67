use burn::prelude::Backend;
use burn::tensor::{Device, Tensor, TensorData};

/// Per-channel normalization applied to batches of images scaled to `[0, 1]`.
#[derive(Clone, Debug)]
pub struct Normalizer<B: Backend> {
    pub mean: Tensor<B, 4>,
    pub std: Tensor<B, 4>,
}

impl<B: Backend> Normalizer<B> {
    /// Creates a new normalizer from one mean and one standard deviation per channel.
    pub fn new(mean: &[f32], std: &[f32], device: &Device<B>) -> Self {
        Self {
            mean: Self::channel_tensor(mean, device),
            std: Self::channel_tensor(std, device),
        }
    }

    fn channel_tensor(values: &[f32], device: &Device<B>) -> Tensor<B, 4> {
        let channels = values.len();
        let data = TensorData::new(values.to_vec(), [channels]);
        Tensor::<B, 1>::from_data(data.convert::<B::FloatElem>(), device).reshape([1, channels, 1, 1])
    }

    /// Normalizes `[batch, channels, height, width]` images as `(input - mean) / std`.
    pub fn normalize(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        (input - self.mean.clone()) / self.std.clone()
    }
}
