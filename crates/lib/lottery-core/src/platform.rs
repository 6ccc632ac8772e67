use std::path::{Path, PathBuf};

use serde::Deserialize;
use typed_builder::TypedBuilder;

/// Where datasets are cached on the machine running the experiment.
#[derive(Deserialize, Debug, Clone, TypedBuilder)]
pub struct PlatformSettings {
    #[builder(setter(into))]
    pub dataset_root: PathBuf,
}

impl PlatformSettings {
    pub fn dataset_dir(&self, dataset_name: &str) -> PathBuf {
        self.dataset_root.join(dataset_name)
    }

    /// Resolves a relative dataset root against the directory of the config file.
    pub fn relative_to(mut self, config_dir: &Path) -> Self {
        if self.dataset_root.is_relative() {
            self.dataset_root = config_dir.join(&self.dataset_root);
        }
        self
    }
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            dataset_root: PathBuf::from("datasets"),
        }
    }
}
