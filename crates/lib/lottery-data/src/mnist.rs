use burn::data::dataset::Dataset;
use log::debug;

use lottery_core::platform::PlatformSettings;
use lottery_core::shape::ImageShape;

use crate::dataset::{ImageDataset, ImageItem, LabeledImages, Split};
use crate::error::DatasetError;
use crate::hub::HubSource;
use crate::layout::Layout;

const SHAPE: ImageShape = ImageShape::new(28, 28, 1);

pub const SOURCE: HubSource = HubSource {
    dataset: "mnist",
    repo: "ylecun/mnist",
    subset: None,
    image_column: "image",
    label_column: "label",
    shape: SHAPE,
    layout: Layout::ChannelsLast,
};

/// The MNIST handwritten digits.
#[derive(Clone, Debug)]
pub struct MnistImages {
    images: LabeledImages,
}

impl MnistImages {
    pub fn new(images: LabeledImages) -> Self {
        Self { images }
    }

    fn load(platform: &PlatformSettings, split: Split) -> Result<Self, DatasetError> {
        let db_file = SOURCE.fetch(&platform.dataset_dir(Self::NAME))?;
        let (raw, labels) = SOURCE.read_split(&db_file, split)?;
        Ok(Self::new(LabeledImages::new(raw, labels, Self::num_classes())?))
    }
}

impl ImageDataset for MnistImages {
    const NAME: &'static str = "mnist";
    const SHAPE: ImageShape = SHAPE;
    const MEAN: &'static [f32] = &[0.1307];
    const STD: &'static [f32] = &[0.3081];

    fn num_train_examples() -> usize {
        60000
    }

    fn num_test_examples() -> usize {
        10000
    }

    fn num_classes() -> usize {
        10
    }

    fn get_train_set(
        platform: &PlatformSettings,
        use_augmentation: bool,
    ) -> Result<Self, DatasetError> {
        if use_augmentation {
            debug!("MNIST is not augmented");
        }
        Self::load(platform, Split::Train)
    }

    fn get_test_set(platform: &PlatformSettings) -> Result<Self, DatasetError> {
        Self::load(platform, Split::Test)
    }

    fn images(&self) -> &LabeledImages {
        &self.images
    }

    fn images_mut(&mut self) -> &mut LabeledImages {
        &mut self.images
    }
}

impl Dataset<ImageItem> for MnistImages {
    fn get(&self, index: usize) -> Option<ImageItem> {
        self.images.item(index)
    }

    fn len(&self) -> usize {
        self.images.len()
    }
}
