//! Instance source: the data directory an annotation run walks

use pcannotate_core::{Error, Instance, InstanceId, Result};
use std::path::{Path, PathBuf};

use crate::discover::discover;
use crate::registry::ReaderRegistry;

/// A data directory, the extension of the files to annotate, and the readers
/// used to decode them.
///
/// Nothing is cached: every [`InstanceSource::decode`] reads the file again.
pub struct InstanceSource {
    root: PathBuf,
    extension: String,
    registry: ReaderRegistry,
}

impl InstanceSource {
    /// Source over `root` with the default readers
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self::with_registry(root, extension, ReaderRegistry::default())
    }

    pub fn with_registry(
        root: impl Into<PathBuf>,
        extension: impl Into<String>,
        registry: ReaderRegistry,
    ) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
            registry,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Fail with [`Error::InvalidConfig`] when no reader handles the
    /// source's extension, before any file is visited
    pub fn check_readable(&self) -> Result<()> {
        if self.registry.reader_for(&self.extension).is_some() {
            return Ok(());
        }
        let extension = self.extension.trim_start_matches('.').to_lowercase();
        let hint = if crate::HDF5_EXTENSIONS.contains(&extension.as_str()) {
            "; HDF5 support requires building with the `hdf5` feature"
        } else {
            ""
        };
        Err(Error::InvalidConfig(format!(
            "no reader for '.{}' files{}",
            extension, hint
        )))
    }

    /// Data files below the root, sorted by path
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        discover(&self.root, &self.extension)
    }

    /// Decode every instance of one data file
    pub fn decode(&self, path: &Path) -> Result<Vec<Instance>> {
        self.registry.decode(path)
    }

    /// Id of the `index`-th instance of `path`
    pub fn instance_id(&self, path: &Path, index: usize) -> InstanceId {
        InstanceId::relative_to(&self.root, path, index)
    }
}
