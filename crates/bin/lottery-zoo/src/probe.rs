use std::fs;
use std::path::Path;

use burn::data::dataloader::batcher::Batcher;
use burn::data::dataset::Dataset;
use burn::prelude::*;
use burn::tensor::ElementConversion;
use log::{debug, info};

use lottery_data::dataset::ImageItem;
use lottery_data::registry as datasets;
use lottery_models::registry as models;

use crate::config::Zoo;

/// Summary of one forward pass over the head of the test split.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    pub examples: usize,
    pub loss: f64,
    pub correct: usize,
}

/// Loads the test split, runs a checked forward pass over its first batch and optionally dumps
/// the first example as an image.
pub fn probe<B: Backend>(
    zoo: &Zoo,
    device: B::Device,
    image_dir: Option<&Path>,
) -> Result<ProbeReport, Box<dyn std::error::Error>> {
    let desc = zoo.hparams()?;
    let dataset = datasets::get(&desc.dataset_hparams, false, &zoo.platform())?;
    let outputs = zoo
        .settings()
        .experiment
        .outputs
        .or(Some(dataset.images().num_classes()));
    let model = models::get::<B>(&desc.model_hparams, outputs, &device)?;

    let count = zoo.settings().experiment.probe_size.min(dataset.len());
    if count == 0 {
        return Err(format!("the {} test split is empty", dataset.name()).into());
    }
    let items: Vec<ImageItem> = (0..count).filter_map(|index| dataset.get(index)).collect();
    let batch = dataset.batcher::<B>(device).batch(items);
    debug!("Probing with a batch of shape {:?}", batch.images.dims());

    let output = model.try_forward(batch.images)?;
    let loss = model
        .loss_criterion()
        .forward(output.clone(), batch.targets.clone())
        .into_scalar()
        .elem::<f64>();
    let predictions = output.argmax(1).squeeze::<1>(1);
    let correct = predictions
        .equal(batch.targets)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>() as usize;

    if let Some(image_dir) = image_dir {
        fs::create_dir_all(image_dir)?;
        if let Some(item) = dataset.get(0) {
            let file = image_dir.join(format!("{}_0_label{}.png", dataset.name(), item.label));
            dataset.example_to_image(&item.pixels)?.save(&file)?;
            info!("Saved the first test example to {}", file.display());
        }
    }

    Ok(ProbeReport {
        examples: count,
        loss,
        correct,
    })
}
