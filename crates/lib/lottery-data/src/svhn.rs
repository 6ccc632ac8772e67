use burn::data::dataset::Dataset;
use log::debug;

use lottery_core::platform::PlatformSettings;
use lottery_core::shape::ImageShape;

use crate::dataset::{ImageDataset, ImageItem, LabeledImages, Split};
use crate::error::DatasetError;
use crate::hub::HubSource;
use crate::layout::Layout;

const SHAPE: ImageShape = ImageShape::new(32, 32, 3);

/// SVHN as published on the hub.
///
/// Decoded crops are laid out channels first and then brought to channels last by swapping
/// axes 1 and 3, so each stored example is the transpose of the published crop.
pub const SOURCE: HubSource = HubSource {
    dataset: "svhn",
    repo: "ufldl-stanford/svhn",
    subset: Some("cropped_digits"),
    image_column: "image",
    label_column: "label",
    shape: SHAPE,
    layout: Layout::ChannelsFirst,
};

/// The Street View House Numbers dataset, cropped digits.
#[derive(Clone, Debug)]
pub struct SvhnImages {
    images: LabeledImages,
}

impl SvhnImages {
    pub fn new(images: LabeledImages) -> Self {
        Self { images }
    }

    fn load(platform: &PlatformSettings, split: Split) -> Result<Self, DatasetError> {
        let db_file = SOURCE.fetch(&platform.dataset_dir(Self::NAME))?;
        let (raw, labels) = SOURCE.read_split(&db_file, split)?;
        Ok(Self::new(LabeledImages::new(raw, labels, Self::num_classes())?))
    }
}

impl ImageDataset for SvhnImages {
    const NAME: &'static str = "svhn";
    const SHAPE: ImageShape = SHAPE;
    const MEAN: &'static [f32] = &[0.4376821, 0.4437697, 0.47280442];
    const STD: &'static [f32] = &[0.19803012, 0.20101562, 0.19703614];

    fn num_train_examples() -> usize {
        73257
    }

    fn num_test_examples() -> usize {
        26032
    }

    fn num_classes() -> usize {
        10
    }

    fn get_train_set(
        platform: &PlatformSettings,
        use_augmentation: bool,
    ) -> Result<Self, DatasetError> {
        if use_augmentation {
            debug!("SVHN is not augmented");
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

impl Dataset<ImageItem> for SvhnImages {
    fn get(&self, index: usize) -> Option<ImageItem> {
        self.images.item(index)
    }

    fn len(&self) -> usize {
        self.images.len()
    }
}
