//! HDF5 instance containers

use hdf5_metno::File;
use log::debug;
use pcannotate_core::{Error, Instance, Result};
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::registry::InstanceReader;

/// File signature at offset 0 of an HDF5 container
const HDF5_SIGNATURE: &[u8; 8] = b"\x89HDF\r\n\x1a\n";

/// Reads the instance table stored in one dataset of an HDF5 file.
///
/// The dataset's first axis enumerates instances. Every remaining axis is
/// flattened and reshaped into `(x, y, z)` triples, so both `(N, P * 3)` and
/// `(N, P, 3)` tables decode to `N` instances of `P` points.
#[derive(Debug, Clone)]
pub struct Hdf5Reader {
    dataset: String,
}

impl Hdf5Reader {
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
        }
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }
}

impl Default for Hdf5Reader {
    fn default() -> Self {
        Self::new(crate::DEFAULT_DATASET)
    }
}

impl InstanceReader for Hdf5Reader {
    fn read_instances(&self, path: &Path) -> Result<Vec<Instance>> {
        let file = File::open(path)
            .map_err(|e| Error::decode(path, format!("failed to open HDF5 file: {}", e)))?;
        let dataset = file.dataset(&self.dataset).map_err(|e| {
            Error::decode(path, format!("missing dataset '{}': {}", self.dataset, e))
        })?;
        let table = dataset.read_dyn::<f32>().map_err(|e| {
            Error::decode(path, format!("failed to read dataset '{}': {}", self.dataset, e))
        })?;

        let shape = table.shape().to_vec();
        if shape.len() < 2 {
            return Err(Error::decode(
                path,
                format!(
                    "dataset '{}' has shape {:?}, expected one row per instance",
                    self.dataset, shape
                ),
            ));
        }
        debug!("Dataset '{}' in {} has shape {:?}", self.dataset, path.display(), shape);

        let row_len: usize = shape[1..].iter().product();
        let values: Vec<f32> = table.iter().copied().collect();
        if row_len == 0 {
            return Ok(vec![Instance::new(); shape[0]]);
        }
        values
            .chunks_exact(row_len)
            .map(|row| Instance::from_flat(row, path))
            .collect()
    }

    fn can_read(&self, path: &Path) -> bool {
        let mut signature = [0u8; 8];
        fs::File::open(path)
            .and_then(|mut file| file.read_exact(&mut signature))
            .map(|_| &signature == HDF5_SIGNATURE)
            .unwrap_or(false)
    }

    fn format_name(&self) -> &'static str {
        "hdf5"
    }

    fn extensions(&self) -> &[&'static str] {
        crate::HDF5_EXTENSIONS
    }
}
