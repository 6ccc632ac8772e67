use std::fs::File;
use std::path::Path;

use csv::WriterBuilder;
use log::debug;
use serde::Serialize;

use crate::error::OutputError;

/// One row of a model summary.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LayerRecord {
    pub layer: String,
    /// Dimensions joined with `x`, e.g. `16x1x3x3`.
    pub shape: String,
    pub parameters: usize,
}

impl LayerRecord {
    pub fn new(layer: impl Into<String>, dims: &[usize]) -> Self {
        let shape: Vec<String> = dims.iter().map(usize::to_string).collect();
        Self {
            layer: layer.into(),
            shape: shape.join("x"),
            parameters: dims.iter().product(),
        }
    }
}

pub fn layer_records(shapes: &[(String, Vec<usize>)]) -> Vec<LayerRecord> {
    shapes
        .iter()
        .map(|(name, dims)| LayerRecord::new(name.as_str(), dims))
        .collect()
}

/// Writes the records to a fresh CSV file with a header row.
pub fn write_summary(file_name: &Path, records: &[LayerRecord]) -> Result<(), OutputError> {
    if let Some(parent) = file_name.parent() {
        std::fs::create_dir_all(parent).map_err(OutputError::io(parent))?;
    }
    let file = File::create(file_name).map_err(OutputError::io(file_name))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(OutputError::io(file_name))?;
    debug!("Wrote {} rows to {}", records.len(), file_name.display());
    Ok(())
}

pub fn total_parameters(records: &[LayerRecord]) -> usize {
    records.iter().map(|record| record.parameters).sum()
}
