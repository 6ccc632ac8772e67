use burn::prelude::Backend;
use hashbrown::HashMap;
use image::{DynamicImage, GrayImage, RgbImage};
use log::debug;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use lottery_core::platform::PlatformSettings;
use lottery_core::shape::ImageShape;

use crate::batcher::ImageBatcher;
use crate::error::DatasetError;
use crate::layout::RawImages;
use crate::normalize::Normalizer;

/// A simple enum to define test and train splits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
        }
    }
}

/// One example as handed to the batcher: raw pixels in `[height, width, channels]` order.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageItem {
    pub pixels: Vec<u8>,
    pub label: usize,
}

/// Raw examples with their labels, index aligned.
///
/// Pixels are kept as bytes in `[index, height, width, channels]` order; normalization only
/// happens later when a batch is assembled.
#[derive(Clone, Debug)]
pub struct LabeledImages {
    examples: Vec<u8>,
    labels: Vec<usize>,
    shape: ImageShape,
    num_classes: usize,
}

impl LabeledImages {
    pub fn new(
        raw: RawImages,
        labels: Vec<usize>,
        num_classes: usize,
    ) -> Result<Self, DatasetError> {
        let raw = raw.into_channels_last();
        if raw.num_examples() != labels.len() {
            return Err(DatasetError::LabelCountMismatch {
                examples: raw.num_examples(),
                labels: labels.len(),
            });
        }
        if let Some((index, &label)) = labels
            .iter()
            .enumerate()
            .find(|(_, label)| **label >= num_classes)
        {
            return Err(DatasetError::LabelOutOfRange {
                index,
                label,
                num_classes,
            });
        }
        let shape = raw.image_shape();
        Ok(Self {
            examples: raw.into_data(),
            labels,
            shape,
            num_classes,
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn shape(&self) -> ImageShape {
        self.shape
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn example(&self, index: usize) -> Option<&[u8]> {
        let size = self.shape.num_values();
        let start = index.checked_mul(size)?;
        self.examples.get(start..start + size)
    }

    pub fn item(&self, index: usize) -> Option<ImageItem> {
        let pixels = self.example(index)?.to_vec();
        Some(ImageItem {
            pixels,
            label: self.labels[index],
        })
    }

    pub fn class_counts(&self) -> HashMap<usize, usize> {
        let mut counts = HashMap::new();
        for label in &self.labels {
            *counts.entry(*label).or_insert(0) += 1;
        }
        counts
    }

    /// Keeps `ceil(len * fraction)` examples picked by a seeded permutation.
    pub fn subsample(&mut self, seed: u64, fraction: f64) -> Result<(), DatasetError> {
        check_fraction("subsample_fraction", fraction)?;
        let to_keep = fraction_of(self.len(), fraction);
        let mut order = self.permutation(seed.wrapping_add(1));
        order.truncate(to_keep);

        let size = self.shape.num_values();
        let mut examples = Vec::with_capacity(to_keep * size);
        let mut labels = Vec::with_capacity(to_keep);
        for index in order {
            examples.extend_from_slice(&self.examples[index * size..(index + 1) * size]);
            labels.push(self.labels[index]);
        }
        debug!("Subsampled {} of {} examples", labels.len(), self.len());
        self.examples = examples;
        self.labels = labels;
        Ok(())
    }

    /// Replaces `ceil(len * fraction)` labels with uniformly drawn classes.
    pub fn randomize_labels(&mut self, seed: u64, fraction: f64) -> Result<(), DatasetError> {
        check_fraction("random_labels_fraction", fraction)?;
        let to_randomize = fraction_of(self.len(), fraction);
        let mut order = self.permutation(seed);
        order.truncate(to_randomize);

        let mut rng = Pcg64::seed_from_u64(seed.wrapping_add(1));
        for index in order {
            self.labels[index] = rng.gen_range(0..self.num_classes);
        }
        debug!("Randomized {} of {} labels", to_randomize, self.len());
        Ok(())
    }

    fn permutation(&self, seed: u64) -> Vec<usize> {
        let mut rng = Pcg64::seed_from_u64(seed);
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.shuffle(&mut rng);
        order
    }
}

/// Number of examples a fraction in `(0, 1]` selects, rounded up.
pub(crate) fn fraction_of(total: usize, fraction: f64) -> usize {
    ((total as f64 * fraction).ceil() as usize).min(total)
}

fn check_fraction(name: &'static str, value: f64) -> Result<(), DatasetError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(DatasetError::InvalidFraction { name, value })
    }
}

/// Reinterprets raw pixels as a displayable image of the given shape.
pub fn pixels_to_image(example: &[u8], shape: ImageShape) -> Result<DynamicImage, DatasetError> {
    let shape_error = || DatasetError::ExampleShape {
        height: shape.height,
        width: shape.width,
        channels: shape.channels,
        expected: shape.num_values(),
        actual: example.len(),
    };
    let (width, height) = (shape.width as u32, shape.height as u32);
    match shape.channels {
        1 => GrayImage::from_raw(width, height, example.to_vec())
            .map(DynamicImage::ImageLuma8)
            .ok_or_else(shape_error),
        3 => RgbImage::from_raw(width, height, example.to_vec())
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(shape_error),
        _ => Err(shape_error()),
    }
}

/// The contract shared by every labeled image dataset.
pub trait ImageDataset: Sized {
    const NAME: &'static str;
    const SHAPE: ImageShape;
    /// Per-channel mean of pixels scaled to `[0, 1]`.
    const MEAN: &'static [f32];
    /// Per-channel standard deviation of pixels scaled to `[0, 1]`.
    const STD: &'static [f32];

    fn num_train_examples() -> usize;

    fn num_test_examples() -> usize;

    fn num_classes() -> usize;

    fn get_train_set(
        platform: &PlatformSettings,
        use_augmentation: bool,
    ) -> Result<Self, DatasetError>;

    fn get_test_set(platform: &PlatformSettings) -> Result<Self, DatasetError>;

    fn images(&self) -> &LabeledImages;

    fn images_mut(&mut self) -> &mut LabeledImages;

    fn example_to_image(&self, example: &[u8]) -> Result<DynamicImage, DatasetError> {
        pixels_to_image(example, Self::SHAPE)
    }

    fn normalizer<B: Backend>(device: &B::Device) -> Normalizer<B> {
        Normalizer::new(Self::MEAN, Self::STD, device)
    }

    fn batcher<B: Backend>(device: B::Device) -> ImageBatcher<B> {
        let normalizer = Self::normalizer::<B>(&device);
        ImageBatcher::new(device, Self::SHAPE, normalizer)
    }
}
