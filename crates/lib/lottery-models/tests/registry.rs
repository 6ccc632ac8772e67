use std::str::FromStr;

use lottery_core::hparams::ModelHparams;
use lottery_models::error::ModelError;
use lottery_models::family::ModelFamily;
use lottery_models::mnist_simplecnn::MnistSimpleCnn;
use lottery_models::registry::{self, RegisteredModel};
use lottery_models::svhn_simplecnn::SvhnSimpleCnn;
use lottery_testutils::backend::{test_device, TestBackend};

fn model_hparams(model_name: &str, model_init: &str) -> ModelHparams {
    ModelHparams::builder()
        .model_name(model_name)
        .model_init(model_init)
        .batchnorm_init("uniform")
        .build()
}

#[test]
fn test_names_resolve_to_families() {
    assert!(registry::exists("mnist_simplecnn_16_32"));
    assert!(registry::exists("svhn_simplecnn_300"));
    assert!(!registry::exists("mnist_simplecnn"));
    assert!(!registry::exists("cifar_resnet_20"));

    assert_eq!(
        RegisteredModel::for_name("svhn_simplecnn_16"),
        Some(RegisteredModel::SvhnSimpleCnn)
    );
    assert_eq!(
        RegisteredModel::from_str("mnist_simplecnn").unwrap(),
        RegisteredModel::MnistSimpleCnn
    );
    assert_eq!(
        RegisteredModel::from_str("mnist_simplecnn_8").unwrap(),
        RegisteredModel::MnistSimpleCnn
    );
    assert!(RegisteredModel::from_str("svhn_lenet").is_err());
}

#[test]
fn test_get_builds_from_hparams() {
    let device = test_device();
    let model = registry::get::<TestBackend>(
        &model_hparams("svhn_simplecnn_16_32", "kaiming_normal"),
        None,
        &device,
    )
    .unwrap();
    assert_eq!(model.channel_widths(), vec![16, 32]);
    assert_eq!(model.fc_input_features(), 2048);
    assert_eq!(model.num_outputs(), 10);

    let model = registry::get::<TestBackend>(
        &model_hparams("mnist_simplecnn_6", "xavier_normal"),
        Some(2),
        &device,
    )
    .unwrap();
    assert_eq!(model.num_outputs(), 2);
}

#[test]
fn test_get_rejects_bad_hparams() {
    let device = test_device();
    assert_eq!(
        registry::get::<TestBackend>(&model_hparams("mnist_simplecnn", "kaiming_normal"), None, &device)
            .unwrap_err(),
        ModelError::InvalidModelName("mnist_simplecnn".to_owned())
    );
    assert_eq!(
        registry::get::<TestBackend>(&model_hparams("mnist_simplecnn_4", "zeros"), None, &device)
            .unwrap_err(),
        ModelError::UnknownInitializer("zeros".to_owned())
    );
    assert_eq!(
        ModelError::InvalidModelName("svhn_simplecnn_0".to_owned()).to_string(),
        "Invalid model name: svhn_simplecnn_0"
    );
}

#[test]
fn test_family_defaults() {
    let mnist = MnistSimpleCnn::default_hparams();
    assert_eq!(mnist.model_hparams.model_name, "mnist_simplecnn_16_32");
    assert_eq!(mnist.model_hparams.model_init, "kaiming_normal");
    assert_eq!(mnist.model_hparams.batchnorm_init, "uniform");
    assert_eq!(mnist.dataset_hparams.dataset_name, "mnist");
    assert_eq!(mnist.dataset_hparams.batch_size, 128);
    assert_eq!(mnist.training_hparams.optimizer_name, "adam");
    assert_eq!(mnist.training_hparams.lr, 5e-2);
    assert_eq!(mnist.training_hparams.training_steps, "3ep");
    assert_eq!(mnist.pruning_hparams.pruning_strategy, "sparse_global");
    assert_eq!(mnist.pruning_hparams.pruning_fraction, 0.2);
    assert_eq!(mnist.pruning_hparams.pruning_layers_to_ignore, "");
    assert!(mnist.validate().is_ok());

    let svhn = SvhnSimpleCnn::default_hparams();
    assert_eq!(svhn.model_hparams.model_name, "svhn_simplecnn_16_32");
    assert_eq!(svhn.dataset_hparams.dataset_name, "svhn");
    assert_eq!(svhn.training_hparams.lr, 1e-2);
    assert_eq!(svhn.training_hparams.training_steps, "5ep");
    assert!(svhn.validate().is_ok());
}

#[test]
fn test_default_hparams_take_the_requested_name() {
    let desc = registry::get_default_hparams("svhn_simplecnn_300").unwrap();
    assert_eq!(desc.model_hparams.model_name, "svhn_simplecnn_300");
    assert_eq!(desc.training_hparams.training_steps, "5ep");
    assert_eq!(desc.end_step(573).unwrap().iteration(), 2865);

    assert!(registry::get_default_hparams("mnist_simplecnn").is_err());
}
