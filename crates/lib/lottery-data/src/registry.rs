use std::fmt::{Display, Formatter};
use std::str::FromStr;

use burn::data::dataset::Dataset;
use burn::prelude::Backend;
use image::DynamicImage;
use log::info;

use lottery_core::hparams::DatasetHparams;
use lottery_core::platform::PlatformSettings;
use lottery_core::shape::ImageShape;

use crate::batcher::ImageBatcher;
use crate::dataset::{fraction_of, ImageDataset, ImageItem, LabeledImages, Split};
use crate::error::DatasetError;
use crate::mnist::MnistImages;
use crate::svhn::SvhnImages;

/// Every dataset that can be named in a hyperparameter bundle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DatasetName {
    Mnist,
    Svhn,
}

impl DatasetName {
    pub const ALL: [DatasetName; 2] = [DatasetName::Mnist, DatasetName::Svhn];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetName::Mnist => MnistImages::NAME,
            DatasetName::Svhn => SvhnImages::NAME,
        }
    }

    pub fn num_train_examples(&self) -> usize {
        match self {
            DatasetName::Mnist => MnistImages::num_train_examples(),
            DatasetName::Svhn => SvhnImages::num_train_examples(),
        }
    }

    pub fn num_test_examples(&self) -> usize {
        match self {
            DatasetName::Mnist => MnistImages::num_test_examples(),
            DatasetName::Svhn => SvhnImages::num_test_examples(),
        }
    }

    pub fn num_classes(&self) -> usize {
        match self {
            DatasetName::Mnist => MnistImages::num_classes(),
            DatasetName::Svhn => SvhnImages::num_classes(),
        }
    }

    pub fn image_shape(&self) -> ImageShape {
        match self {
            DatasetName::Mnist => MnistImages::SHAPE,
            DatasetName::Svhn => SvhnImages::SHAPE,
        }
    }

    pub fn batcher<B: Backend>(&self, device: B::Device) -> ImageBatcher<B> {
        match self {
            DatasetName::Mnist => MnistImages::batcher(device),
            DatasetName::Svhn => SvhnImages::batcher(device),
        }
    }

    fn load(
        &self,
        split: Split,
        platform: &PlatformSettings,
        use_augmentation: bool,
    ) -> Result<RegisteredDataset, DatasetError> {
        let dataset = match (self, split) {
            (DatasetName::Mnist, Split::Train) => {
                RegisteredDataset::Mnist(MnistImages::get_train_set(platform, use_augmentation)?)
            }
            (DatasetName::Mnist, Split::Test) => {
                RegisteredDataset::Mnist(MnistImages::get_test_set(platform)?)
            }
            (DatasetName::Svhn, Split::Train) => {
                RegisteredDataset::Svhn(SvhnImages::get_train_set(platform, use_augmentation)?)
            }
            (DatasetName::Svhn, Split::Test) => {
                RegisteredDataset::Svhn(SvhnImages::get_test_set(platform)?)
            }
        };
        Ok(dataset)
    }
}

impl FromStr for DatasetName {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mnist" => Ok(DatasetName::Mnist),
            "svhn" => Ok(DatasetName::Svhn),
            _ => Err(DatasetError::UnknownDataset(s.to_owned())),
        }
    }
}

impl Display for DatasetName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A loaded dataset of any registered kind.
#[derive(Clone, Debug)]
pub enum RegisteredDataset {
    Mnist(MnistImages),
    Svhn(SvhnImages),
}

impl RegisteredDataset {
    pub fn name(&self) -> DatasetName {
        match self {
            RegisteredDataset::Mnist(_) => DatasetName::Mnist,
            RegisteredDataset::Svhn(_) => DatasetName::Svhn,
        }
    }

    pub fn images(&self) -> &LabeledImages {
        match self {
            RegisteredDataset::Mnist(mnist) => mnist.images(),
            RegisteredDataset::Svhn(svhn) => svhn.images(),
        }
    }

    pub fn images_mut(&mut self) -> &mut LabeledImages {
        match self {
            RegisteredDataset::Mnist(mnist) => mnist.images_mut(),
            RegisteredDataset::Svhn(svhn) => svhn.images_mut(),
        }
    }

    pub fn example_to_image(&self, example: &[u8]) -> Result<DynamicImage, DatasetError> {
        match self {
            RegisteredDataset::Mnist(mnist) => mnist.example_to_image(example),
            RegisteredDataset::Svhn(svhn) => svhn.example_to_image(example),
        }
    }

    pub fn batcher<B: Backend>(&self, device: B::Device) -> ImageBatcher<B> {
        self.name().batcher(device)
    }
}

impl Dataset<ImageItem> for RegisteredDataset {
    fn get(&self, index: usize) -> Option<ImageItem> {
        self.images().item(index)
    }

    fn len(&self) -> usize {
        self.images().len()
    }
}

/// Loads the train or test split named by the hyperparameters.
///
/// Label randomization and subsampling only touch the training split, both seeded by the
/// transformation seed.
pub fn get(
    dataset_hparams: &DatasetHparams,
    train: bool,
    platform: &PlatformSettings,
) -> Result<RegisteredDataset, DatasetError> {
    let name = DatasetName::from_str(&dataset_hparams.dataset_name)?;
    let split = if train { Split::Train } else { Split::Test };
    let use_augmentation = train && !dataset_hparams.do_not_augment;

    let dataset = name.load(split, platform, use_augmentation)?;
    let dataset = prepare(dataset, dataset_hparams, train)?;
    info!(
        "Loaded {} {} examples of {}",
        dataset.len(),
        split.as_str(),
        name
    );
    Ok(dataset)
}

/// Applies the training-split transforms of the hyperparameters to a loaded dataset.
///
/// Labels are randomized before the split is subsampled. Test splits pass through unchanged.
pub fn prepare(
    mut dataset: RegisteredDataset,
    dataset_hparams: &DatasetHparams,
    train: bool,
) -> Result<RegisteredDataset, DatasetError> {
    if !train {
        return Ok(dataset);
    }
    let seed = dataset_hparams.seed();
    if let Some(fraction) = dataset_hparams.random_labels_fraction {
        dataset.images_mut().randomize_labels(seed, fraction)?;
    }
    if let Some(fraction) = dataset_hparams.subsample_fraction {
        dataset.images_mut().subsample(seed, fraction)?;
    }
    Ok(dataset)
}

pub fn num_train_examples(dataset_hparams: &DatasetHparams) -> Result<usize, DatasetError> {
    let name = DatasetName::from_str(&dataset_hparams.dataset_name)?;
    let total = name.num_train_examples();
    Ok(match dataset_hparams.subsample_fraction {
        Some(fraction) => fraction_of(total, fraction),
        None => total,
    })
}

pub fn num_test_examples(dataset_hparams: &DatasetHparams) -> Result<usize, DatasetError> {
    Ok(DatasetName::from_str(&dataset_hparams.dataset_name)?.num_test_examples())
}

pub fn num_classes(dataset_hparams: &DatasetHparams) -> Result<usize, DatasetError> {
    Ok(DatasetName::from_str(&dataset_hparams.dataset_name)?.num_classes())
}

/// Batches per pass over the (possibly subsampled) training split.
pub fn iterations_per_epoch(dataset_hparams: &DatasetHparams) -> Result<u64, DatasetError> {
    if dataset_hparams.batch_size == 0 {
        return Err(DatasetError::ZeroBatchSize);
    }
    let examples = num_train_examples(dataset_hparams)?;
    Ok(examples.div_ceil(dataset_hparams.batch_size) as u64)
}
