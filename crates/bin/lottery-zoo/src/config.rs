use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::warn;
use serde::Deserialize;

use lottery_core::config::ConfigReader;
use lottery_core::desc::LotteryDesc;
use lottery_core::platform::PlatformSettings;
use lottery_data::registry::DatasetName;
use lottery_models::error::ModelError;
use lottery_models::registry::{self, RegisteredModel};
use lottery_output::logger::{initiate_logger, LogSettings};

use crate::backend::BackendKind;

#[derive(Deserialize, Debug, Clone)]
pub struct ExperimentSettings {
    pub model_name: String,
    #[serde(default)]
    pub backend: BackendKind,
    pub output_path: String,
    pub outputs: Option<usize>,
    #[serde(default = "default_probe_size")]
    pub probe_size: usize,
}

fn default_probe_size() -> usize {
    16
}

#[derive(Deserialize, Debug, Clone)]
pub struct ZooSettings {
    pub log_settings: Option<LogSettings>,
    #[serde(default)]
    pub platform: PlatformSettings,
    pub experiment: ExperimentSettings,
    /// Overrides the defaults of the model family when present.
    pub hparams: Option<LotteryDesc>,
}

/// A parsed config file together with the directory it was read from.
#[derive(Debug, Clone)]
pub struct Zoo {
    config_dir: PathBuf,
    settings: ZooSettings,
}

impl Zoo {
    pub fn new(config_file: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let reader = ConfigReader::<ZooSettings>::new(config_file);
        let settings = reader.parse()?;
        Ok(Self::with_settings(reader.config_dir(), settings))
    }

    pub fn with_settings(config_dir: PathBuf, settings: ZooSettings) -> Self {
        Self {
            config_dir,
            settings,
        }
    }

    pub fn settings(&self) -> &ZooSettings {
        &self.settings
    }

    /// File logging when configured, stderr otherwise.
    pub fn init_logger(&self) -> Result<(), Box<dyn std::error::Error>> {
        match &self.settings.log_settings {
            Some(log_settings) => initiate_logger(&self.config_dir, log_settings)?,
            None => env_logger::try_init()?,
        }
        Ok(())
    }

    pub fn platform(&self) -> PlatformSettings {
        self.settings.platform.clone().relative_to(&self.config_dir)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.config_dir.join(&self.settings.experiment.output_path)
    }

    pub fn model_name(&self) -> &str {
        &self.settings.experiment.model_name
    }

    /// The experiment's hyperparameters, checked, with the configured model name.
    ///
    /// Explicit hyperparameters naming a different model are renamed with a warning; a dataset
    /// whose images the model cannot take is rejected.
    pub fn hparams(&self) -> Result<LotteryDesc, Box<dyn std::error::Error>> {
        let mut desc = match &self.settings.hparams {
            Some(desc) => desc.clone(),
            None => registry::get_default_hparams(self.model_name())?,
        };
        if desc.model_hparams.model_name != self.model_name() {
            warn!(
                "Replacing model_name {} of [hparams] with {}",
                desc.model_hparams.model_name,
                self.model_name()
            );
            desc.model_hparams.model_name = self.model_name().to_owned();
        }
        desc.validate()?;
        check_dataset(self.model_name(), &desc.dataset_hparams.dataset_name)?;
        Ok(desc)
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

fn check_dataset(model_name: &str, dataset_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let family = RegisteredModel::for_name(model_name)
        .ok_or_else(|| ModelError::InvalidModelName(model_name.to_owned()))?;
    let expected = family.input_shape();
    let actual = DatasetName::from_str(dataset_name)?.image_shape();
    if expected != actual {
        return Err(ModelError::DatasetMismatch {
            model: model_name.to_owned(),
            dataset: dataset_name.to_owned(),
            expected: [expected.height, expected.width, expected.channels],
            actual: [actual.height, actual.width, actual.channels],
        }
        .into());
    }
    Ok(())
}
