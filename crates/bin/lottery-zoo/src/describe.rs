use std::fs;

use burn::prelude::Backend;
use log::info;

use lottery_data::registry as datasets;
use lottery_models::registry as models;
use lottery_output::summary::{layer_records, total_parameters, write_summary};

use crate::config::Zoo;

/// Writes the resolved hyperparameters and a layer summary of the configured model.
pub fn describe<B: Backend>(zoo: &Zoo, device: B::Device) -> Result<(), Box<dyn std::error::Error>> {
    let desc = zoo.hparams()?;
    let iterations_per_epoch = datasets::iterations_per_epoch(&desc.dataset_hparams)?;
    let end_step = desc.end_step(iterations_per_epoch)?;
    let milestones = desc.milestones(iterations_per_epoch)?;
    let outputs = zoo
        .settings()
        .experiment
        .outputs
        .or(Some(datasets::num_classes(&desc.dataset_hparams)?));

    let model = models::get::<B>(&desc.model_hparams, outputs, &device)?;
    let records = layer_records(&model.parameter_shapes());

    let output_dir = zoo.output_dir();
    fs::create_dir_all(&output_dir)?;
    let hparams_file = output_dir.join(format!("{}_hparams.toml", zoo.model_name()));
    fs::write(&hparams_file, desc.to_toml()?)?;
    let summary_file = output_dir.join(format!("{}_summary.csv", zoo.model_name()));
    write_summary(&summary_file, &records)?;
    info!(
        "Wrote {} and {}",
        hparams_file.display(),
        summary_file.display()
    );

    println!("model:       {}", desc.model_hparams.model_name);
    println!("widths:      {:?}", model.channel_widths());
    println!("input:       {}", model.input_shape());
    println!("features:    {}", model.fc_input_features());
    println!("parameters:  {}", total_parameters(&records));
    println!("prunable:    {}", model.prunable_layer_names().join(", "));
    println!("output:      {}", model.output_layer_names().join(", "));
    println!(
        "training:    {} ({} iterations of {} per epoch)",
        end_step,
        end_step.iteration(),
        iterations_per_epoch
    );
    if !milestones.is_empty() {
        let milestones: Vec<String> = milestones.iter().map(ToString::to_string).collect();
        println!("milestones:  {}", milestones.join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use lottery_testutils::backend::{test_device, TestBackend};

    use super::*;

    #[test]
    fn test_describe_writes_hparams_and_summary() {
        let dir = std::env::temp_dir().join(format!("lottery-zoo-describe-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let config_file = dir.join("zoo.toml");
        fs::write(
            &config_file,
            r#"
            [experiment]
            model_name = "mnist_simplecnn_4_8"
            output_path = "out"
            "#,
        )
        .unwrap();

        let zoo = Zoo::new(config_file.to_str().unwrap()).unwrap();
        describe::<TestBackend>(&zoo, test_device()).unwrap();

        let hparams =
            fs::read_to_string(dir.join("out").join("mnist_simplecnn_4_8_hparams.toml")).unwrap();
        let desc = lottery_core::desc::LotteryDesc::from_toml(&hparams).unwrap();
        assert_eq!(desc.model_hparams.model_name, "mnist_simplecnn_4_8");
        assert_eq!(desc.training_hparams.training_steps, "3ep");

        let summary =
            fs::read_to_string(dir.join("out").join("mnist_simplecnn_4_8_summary.csv")).unwrap();
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines[0], "layer,shape,parameters");
        assert_eq!(lines[1], "conv_layers.0.weight,4x1x3x3,36");
        assert_eq!(lines[5], "fc.weight,392x10,3920");
        fs::remove_dir_all(dir).unwrap();
    }
}
