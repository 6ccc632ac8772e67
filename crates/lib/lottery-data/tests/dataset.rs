use lottery_core::shape::ImageShape;
use lottery_data::dataset::{ImageDataset, LabeledImages};
use lottery_data::error::DatasetError;
use lottery_data::layout::{Layout, RawImages};
use lottery_data::mnist::MnistImages;
use lottery_data::svhn::SvhnImages;
use lottery_testutils::images::{cycling_labels, position_pixels};

const SMALL: ImageShape = ImageShape::new(2, 2, 3);

fn small_images(count: usize) -> LabeledImages {
    let raw = RawImages::new(
        position_pixels(count, SMALL),
        [count, 2, 2, 3],
        Layout::ChannelsLast,
    )
    .unwrap();
    LabeledImages::new(raw, cycling_labels(count, 4), 4).unwrap()
}

#[test]
fn test_examples_and_labels_stay_aligned() {
    let images = small_images(5);
    assert_eq!(images.len(), 5);
    assert_eq!(images.shape(), SMALL);
    let item = images.item(3).unwrap();
    assert_eq!(item.label, 3);
    assert_eq!(item.pixels, images.example(3).unwrap());
    assert_eq!(item.pixels[0], 36);
    assert!(images.item(5).is_none());
}

#[test]
fn test_label_count_must_match() {
    let raw = RawImages::new(position_pixels(3, SMALL), [3, 2, 2, 3], Layout::ChannelsLast)
        .unwrap();
    let result = LabeledImages::new(raw, vec![0, 1], 4);
    assert!(matches!(
        result,
        Err(DatasetError::LabelCountMismatch {
            examples: 3,
            labels: 2
        })
    ));
}

#[test]
fn test_labels_must_be_below_class_count() {
    let raw = RawImages::new(position_pixels(3, SMALL), [3, 2, 2, 3], Layout::ChannelsLast)
        .unwrap();
    let result = LabeledImages::new(raw, vec![0, 4, 1], 4);
    assert!(matches!(
        result,
        Err(DatasetError::LabelOutOfRange {
            index: 1,
            label: 4,
            num_classes: 4
        })
    ));
}

#[test]
fn test_channels_first_sources_are_swapped_on_load() {
    let raw = RawImages::new(position_pixels(2, SMALL), [2, 3, 2, 2], Layout::ChannelsFirst)
        .unwrap();
    let images = LabeledImages::new(raw, vec![0, 1], 2).unwrap();
    assert_eq!(images.shape(), ImageShape::new(2, 2, 3));
    // Second channel of the first pixel comes from the second channel plane.
    assert_eq!(images.example(0).unwrap()[1], 4);
}

#[test]
fn test_subsample_is_seeded_and_rounds_up() {
    let mut a = small_images(10);
    let mut b = small_images(10);
    a.subsample(7, 0.25).unwrap();
    b.subsample(7, 0.25).unwrap();
    assert_eq!(a.len(), 3);
    assert_eq!(a.labels(), b.labels());
    assert_eq!(a.example(0), b.example(0));

    for index in 0..a.len() {
        let item = a.item(index).unwrap();
        let original = small_images(10);
        let source = (0..10)
            .find(|&i| original.example(i).unwrap() == item.pixels.as_slice())
            .unwrap();
        assert_eq!(original.labels()[source], item.label);
    }
}

#[test]
fn test_randomize_labels_keeps_examples() {
    let mut images = small_images(40);
    let before = images.example(17).unwrap().to_vec();
    images.randomize_labels(3, 0.5).unwrap();
    assert_eq!(images.len(), 40);
    assert_eq!(images.example(17).unwrap(), before.as_slice());
    assert!(images.labels().iter().all(|&label| label < 4));

    let counts = images.class_counts();
    assert_eq!(counts.values().sum::<usize>(), 40);
}

#[test]
fn test_fractions_are_checked() {
    let mut images = small_images(4);
    assert!(matches!(
        images.subsample(0, 1.5),
        Err(DatasetError::InvalidFraction { .. })
    ));
    assert!(matches!(
        images.randomize_labels(0, 0.0),
        Err(DatasetError::InvalidFraction { .. })
    ));
}

#[test]
fn test_class_counts() {
    let counts = small_images(10).class_counts();
    assert_eq!(counts.get(&0), Some(&3));
    assert_eq!(counts.get(&1), Some(&3));
    assert_eq!(counts.get(&2), Some(&2));
    assert_eq!(counts.get(&3), Some(&2));
}

#[test]
fn test_example_to_image_uses_dataset_shape() {
    let pixels = position_pixels(1, SvhnImages::SHAPE);
    let raw = RawImages::new(pixels.clone(), [1, 32, 32, 3], Layout::ChannelsLast).unwrap();
    let svhn = SvhnImages::new(LabeledImages::new(raw, vec![5], 10).unwrap());
    let image = svhn.example_to_image(&pixels).unwrap().into_rgb8();
    assert_eq!(image.dimensions(), (32, 32));
    assert_eq!(image.get_pixel(1, 0).0, [3, 4, 5]);

    assert!(matches!(
        svhn.example_to_image(&pixels[..100]),
        Err(DatasetError::ExampleShape { actual: 100, .. })
    ));
}

#[test]
fn test_mnist_example_is_grayscale() {
    let pixels = position_pixels(1, MnistImages::SHAPE);
    let raw = RawImages::grayscale(pixels.clone(), [1, 28, 28]).unwrap();
    let mnist = MnistImages::new(LabeledImages::new(raw, vec![9], 10).unwrap());
    let image = mnist.example_to_image(&pixels).unwrap();
    assert!(image.as_luma8().is_some());
    assert_eq!(image.width(), 28);
}

#[test]
fn test_dataset_constants() {
    assert_eq!(SvhnImages::num_train_examples(), 73257);
    assert_eq!(SvhnImages::num_test_examples(), 26032);
    assert_eq!(SvhnImages::num_classes(), 10);
    assert_eq!(MnistImages::num_train_examples(), 60000);
    assert_eq!(MnistImages::num_test_examples(), 10000);
    assert_eq!(MnistImages::num_classes(), 10);
}
