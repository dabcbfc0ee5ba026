//! I/O operations for pcannotate
//!
//! This crate finds data files under a directory, decodes each of them into
//! a sequence of point cloud instances, and persists the annotation log.

pub mod discover;
pub mod registry;
pub mod csv_rows;
#[cfg(feature = "hdf5")]
pub mod hdf5;
pub mod source;
pub mod store;

pub use discover::discover;
pub use registry::{InstanceReader, ReaderRegistry};
pub use csv_rows::{CsvRowsReader, Delimiter};
#[cfg(feature = "hdf5")]
pub use self::hdf5::Hdf5Reader;
pub use source::InstanceSource;
pub use store::AnnotationStore;

use pcannotate_core::{Instance, Result};
use std::path::Path;

/// Extension of the files the annotator looks for by default
#[cfg(feature = "hdf5")]
pub const DEFAULT_EXTENSION: &str = "h5";

/// Extension of the files the annotator looks for by default. HDF5 support
/// is not compiled in, so plain-text tables are the default.
#[cfg(not(feature = "hdf5"))]
pub const DEFAULT_EXTENSION: &str = "csv";

/// Extensions of HDF5 containers
pub const HDF5_EXTENSIONS: &[&str] = &["h5", "hdf5", "hdf"];

/// Dataset holding the instance table inside an HDF5 container
pub const DEFAULT_DATASET: &str = "train/clouds";

/// Decode every instance of `path` with the default readers
pub fn decode<P: AsRef<Path>>(path: P) -> Result<Vec<Instance>> {
    ReaderRegistry::default().decode(path.as_ref())
}
