use burn::data::dataloader::batcher::Batcher;
use burn::module::AutodiffModule;
use burn::prelude::*;
use burn::train::{TrainStep, ValidStep};

use lottery_core::shape::ImageShape;
use lottery_data::dataset::{ImageDataset, ImageItem};
use lottery_data::mnist::MnistImages;
use lottery_models::error::ModelError;
use lottery_models::family::ModelFamily;
use lottery_models::init::initializer_from_name;
use lottery_models::mnist_simplecnn::MnistSimpleCnn;
use lottery_models::plan::ChannelPlan;
use lottery_models::simplecnn::SimpleCnnConfig;
use lottery_models::svhn_simplecnn::SvhnSimpleCnn;
use lottery_testutils::backend::{test_device, TestAutodiffBackend, TestBackend};
use lottery_testutils::images::flat_pixels;

fn config<F: ModelFamily>(name: &str) -> SimpleCnnConfig {
    let initializer = initializer_from_name("kaiming_normal").unwrap();
    F::config_from_name(name, initializer, None).unwrap()
}

#[test]
fn test_feature_counts() {
    assert_eq!(
        config::<MnistSimpleCnn>("mnist_simplecnn_16_32")
            .feature_count()
            .unwrap(),
        1568
    );
    assert_eq!(
        config::<SvhnSimpleCnn>("svhn_simplecnn_16_32")
            .feature_count()
            .unwrap(),
        2048
    );
    assert_eq!(
        config::<SvhnSimpleCnn>("svhn_simplecnn_300")
            .feature_count()
            .unwrap(),
        76800
    );
    // 28 -> 14 -> 7 -> 3
    assert_eq!(
        config::<MnistSimpleCnn>("mnist_simplecnn_4_4_5")
            .feature_count()
            .unwrap(),
        45
    );
}

#[test]
fn test_collapsing_input_is_rejected() {
    let mnist = config::<MnistSimpleCnn>("mnist_simplecnn_1_1_1_1_1");
    assert_eq!(
        mnist.feature_count(),
        Err(ModelError::InputTooSmall {
            height: 28,
            width: 28,
            stages: 5
        })
    );
    assert!(mnist.init::<TestBackend>(&test_device()).is_err());

    let svhn = config::<SvhnSimpleCnn>("svhn_simplecnn_1_1_1_1_1");
    assert_eq!(svhn.feature_count(), Ok(1));
}

#[test]
fn test_built_model_reports_its_plan() {
    let device = test_device();
    let initializer = initializer_from_name("xavier_uniform").unwrap();
    let model = MnistSimpleCnn::get_model_from_name::<TestBackend>(
        "mnist_simplecnn_16_32",
        initializer,
        None,
        &device,
    )
    .unwrap();

    assert_eq!(model.channel_widths(), vec![16, 32]);
    assert_eq!(model.fc_input_features(), 1568);
    assert_eq!(model.num_outputs(), 10);
    assert_eq!(model.input_shape(), ImageShape::new(28, 28, 1));
    assert_eq!(model.output_layer_names(), vec!["fc.weight", "fc.bias"]);
    assert_eq!(
        model.prunable_layer_names(),
        vec!["conv_layers.0.weight", "conv_layers.1.weight", "fc.weight"]
    );

    let shapes = model.parameter_shapes();
    assert_eq!(shapes[0], ("conv_layers.0.weight".to_string(), vec![16, 1, 3, 3]));
    assert_eq!(shapes[2], ("conv_layers.1.weight".to_string(), vec![32, 16, 3, 3]));
    assert_eq!(shapes[4], ("fc.weight".to_string(), vec![1568, 10]));
    assert_eq!(shapes[5], ("fc.bias".to_string(), vec![10]));
}

#[test]
fn test_widths_round_trip_through_names() {
    let device = test_device();
    for widths in [vec![3], vec![8, 4], vec![2, 6, 5]] {
        let plan = ChannelPlan::new(widths.clone()).unwrap();
        let name = plan.model_name(SvhnSimpleCnn::PREFIX);
        let initializer = initializer_from_name("kaiming_uniform").unwrap();
        let model =
            SvhnSimpleCnn::get_model_from_name::<TestBackend>(&name, initializer, Some(4), &device)
                .unwrap();
        assert_eq!(model.channel_widths(), widths);
        assert_eq!(model.num_outputs(), 4);
    }
}

#[test]
fn test_forward_shapes() {
    let device = test_device();
    let model = config::<SvhnSimpleCnn>("svhn_simplecnn_8_4")
        .with_outputs(7)
        .init::<TestBackend>(&device)
        .unwrap();

    let images = Tensor::<TestBackend, 4>::zeros([5, 3, 32, 32], &device);
    let output = model.try_forward(images).unwrap();
    assert_eq!(output.dims(), [5, 7]);
}

#[test]
fn test_try_forward_checks_input_shape() {
    let device = test_device();
    let model = config::<MnistSimpleCnn>("mnist_simplecnn_4")
        .init::<TestBackend>(&device)
        .unwrap();

    let images = Tensor::<TestBackend, 4>::zeros([2, 3, 32, 32], &device);
    assert_eq!(
        model.try_forward(images).unwrap_err(),
        ModelError::InputShape {
            expected: [1, 28, 28],
            actual: [3, 32, 32]
        }
    );
}

#[test]
#[should_panic(expected = "Expected input of shape")]
fn test_forward_panics_on_wrong_shape() {
    let device = test_device();
    let model = config::<MnistSimpleCnn>("mnist_simplecnn_4")
        .init::<TestBackend>(&device)
        .unwrap();
    model.forward(Tensor::<TestBackend, 4>::zeros([1, 1, 27, 28], &device));
}

fn mnist_items(count: usize) -> Vec<ImageItem> {
    (0..count)
        .map(|index| ImageItem {
            pixels: flat_pixels(1, MnistImages::SHAPE, (index * 40) as u8),
            label: index % 10,
        })
        .collect()
}

#[test]
fn test_train_and_valid_steps() {
    let device = test_device();
    let initializer = initializer_from_name("kaiming_normal").unwrap();
    let model = MnistSimpleCnn::get_model_from_name::<TestAutodiffBackend>(
        "mnist_simplecnn_4_8",
        initializer,
        None,
        &device,
    )
    .unwrap();

    let batch = MnistImages::batcher::<TestAutodiffBackend>(device).batch(mnist_items(4));
    let output = TrainStep::step(&model, batch);
    assert_eq!(output.item.output.dims(), [4, 10]);
    let loss = output.item.loss.into_scalar();
    assert!(loss.is_finite() && loss > 0.0);

    let model = model.valid();
    let batch = MnistImages::batcher::<TestBackend>(device).batch(mnist_items(3));
    let output = ValidStep::step(&model, batch);
    assert_eq!(output.output.dims(), [3, 10]);
    assert_eq!(output.targets.dims(), [3]);
}

#[test]
fn test_zero_outputs_fall_back_to_ten() {
    let device = test_device();
    let initializer = initializer_from_name("kaiming_normal").unwrap();
    let config =
        MnistSimpleCnn::config_from_name("mnist_simplecnn_4", initializer.clone(), Some(0)).unwrap();
    assert_eq!(config.outputs, 10);

    let model = MnistSimpleCnn::get_model_from_name::<TestBackend>(
        "mnist_simplecnn_4",
        initializer,
        Some(0),
        &device,
    )
    .unwrap();
    assert_eq!(model.num_outputs(), 10);
}
