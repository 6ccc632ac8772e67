use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use log::debug;
use serde::de::DeserializeOwned;

/// Reads a TOML configuration file into any deserializable settings struct.
pub struct ConfigReader<T> {
    file_path: PathBuf,
    settings: PhantomData<T>,
}

impl<T: DeserializeOwned> ConfigReader<T> {
    pub fn new(file_name: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_name.as_ref().to_path_buf(),
            settings: PhantomData,
        }
    }

    pub fn parse(&self) -> Result<T, Box<dyn std::error::Error>> {
        debug!("Reading configuration from {}", self.file_path.display());
        let parsing_result = std::fs::read_to_string(&self.file_path)?;
        let config: T = toml::from_str(&parsing_result)?;
        Ok(config)
    }

    /// Directory holding the config file, against which relative paths are resolved.
    pub fn config_dir(&self) -> PathBuf {
        self.file_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }
}
