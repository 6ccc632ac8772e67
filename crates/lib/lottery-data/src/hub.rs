use std::path::{Path, PathBuf};

use burn::data::dataset::HuggingfaceDatasetLoader;
use image::load_from_memory;
use log::{debug, info};
use rusqlite::Connection;

use lottery_core::shape::ImageShape;

use crate::dataset::Split;
use crate::error::DatasetError;
use crate::layout::{hwc_to_chw, Layout, RawImages};

/// A Hugging Face image dataset as cached by burn's dataset importer.
///
/// The importer stores every split as an SQLite table in which an image column `<name>` is
/// flattened into `<name>_bytes` (the encoded file) and `<name>_path`. Decoded images are
/// handed on in `layout` order.
#[derive(Clone, Copy, Debug)]
pub struct HubSource {
    pub dataset: &'static str,
    pub repo: &'static str,
    pub subset: Option<&'static str>,
    pub image_column: &'static str,
    pub label_column: &'static str,
    pub shape: ImageShape,
    pub layout: Layout,
}

impl HubSource {
    /// Downloads the dataset on first use and returns the SQLite cache file.
    pub fn fetch(&self, base_dir: &Path) -> Result<PathBuf, DatasetError> {
        let fetch_error = |reason: String| DatasetError::Fetch {
            dataset: self.dataset,
            reason,
        };
        let base_dir = base_dir
            .to_str()
            .ok_or_else(|| fetch_error(format!("{} is not valid UTF-8", base_dir.display())))?;

        info!("Fetching {} from the hub into {}", self.repo, base_dir);
        let mut loader = HuggingfaceDatasetLoader::new(self.repo).with_base_dir(base_dir);
        if let Some(subset) = self.subset {
            loader = loader.with_subset(subset);
        }
        loader.db_file().map_err(|e| fetch_error(e.to_string()))
    }

    /// Decodes every image of a split, in row order, together with its label.
    pub fn read_split(
        &self,
        db_file: &Path,
        split: Split,
    ) -> Result<(RawImages, Vec<usize>), DatasetError> {
        let connection = Connection::open(db_file)?;
        let query = format!(
            "SELECT {}_bytes, {} FROM {} ORDER BY row_id",
            self.image_column,
            self.label_column,
            split.as_str()
        );
        let mut statement = connection.prepare(&query)?;
        let rows = statement.query_map([], |row| {
            Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut pixels = Vec::new();
        let mut labels = Vec::new();
        for row in rows {
            let (encoded, label) = row?;
            let index = labels.len();
            let label = usize::try_from(label)
                .map_err(|_| DatasetError::NegativeLabel { index, label })?;
            let decoded = self.decode(&encoded)?;
            match self.layout {
                Layout::ChannelsLast => pixels.extend(decoded),
                Layout::ChannelsFirst => pixels.extend(hwc_to_chw(&decoded, self.shape)),
            }
            labels.push(label);
        }
        debug!(
            "Read {} {} examples of {}",
            labels.len(),
            split.as_str(),
            self.dataset
        );

        let shape = match self.layout {
            Layout::ChannelsLast => [
                labels.len(),
                self.shape.height,
                self.shape.width,
                self.shape.channels,
            ],
            Layout::ChannelsFirst => [
                labels.len(),
                self.shape.channels,
                self.shape.height,
                self.shape.width,
            ],
        };
        let raw = RawImages::new(pixels, shape, self.layout)?;
        Ok((raw, labels))
    }

    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>, DatasetError> {
        let image = load_from_memory(encoded)?;
        let same_size = image.height() as usize == self.shape.height
            && image.width() as usize == self.shape.width;
        let pixels = match self.shape.channels {
            1 => image.into_luma8().into_raw(),
            _ => image.into_rgb8().into_raw(),
        };
        if !same_size || pixels.len() != self.shape.num_values() {
            return Err(DatasetError::ExampleShape {
                height: self.shape.height,
                width: self.shape.width,
                channels: self.shape.channels,
                expected: self.shape.num_values(),
                actual: pixels.len(),
            });
        }
        Ok(pixels)
    }
}
