//! Format registry for instance decoding
//!
//! Readers are looked up by file extension first; when no reader claims the
//! extension, each registered reader gets a chance to recognise the file by
//! its header.

use indexmap::IndexMap;
use log::debug;
use pcannotate_core::{Error, Instance, Result};
use std::path::Path;
use std::sync::Arc;

use crate::csv_rows::CsvRowsReader;

/// Trait for decoding a data file into its instances
pub trait InstanceReader: Send + Sync {
    /// Decode every instance stored in `path`, in file order
    fn read_instances(&self, path: &Path) -> Result<Vec<Instance>>;

    /// Check if this reader can handle the given file by examining its header
    fn can_read(&self, path: &Path) -> bool;

    /// Get the format name this reader handles
    fn format_name(&self) -> &'static str;

    /// File extensions this reader is registered under, without dots
    fn extensions(&self) -> &[&'static str];
}

/// Registry of instance readers keyed by lowercase extension
pub struct ReaderRegistry {
    readers: IndexMap<String, Arc<dyn InstanceReader>>,
}

impl ReaderRegistry {
    /// Create a registry with no readers
    pub fn new() -> Self {
        Self {
            readers: IndexMap::new(),
        }
    }

    /// Create a registry with every built-in reader, reading HDF5 instances
    /// from `hdf5_dataset`
    pub fn with_defaults(hdf5_dataset: &str) -> Self {
        let mut registry = Self::new();
        registry.register(CsvRowsReader::new());
        #[cfg(feature = "hdf5")]
        registry.register(crate::hdf5::Hdf5Reader::new(hdf5_dataset));
        #[cfg(not(feature = "hdf5"))]
        debug!(
            "HDF5 support not compiled in, dataset '{}' will not be read",
            hdf5_dataset
        );
        registry
    }

    /// Register `reader` under each of its extensions, replacing any reader
    /// previously registered there
    pub fn register<R: InstanceReader + 'static>(&mut self, reader: R) {
        let reader: Arc<dyn InstanceReader> = Arc::new(reader);
        for ext in reader.extensions() {
            self.readers.insert(ext.to_lowercase(), Arc::clone(&reader));
        }
    }

    /// Reader registered for `extension`, if any
    pub fn reader_for(&self, extension: &str) -> Option<&dyn InstanceReader> {
        self.readers
            .get(&extension.trim_start_matches('.').to_lowercase())
            .map(|reader| reader.as_ref())
    }

    /// Registered extensions in registration order
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.readers.keys().map(String::as_str)
    }

    /// Decode every instance of `path`.
    ///
    /// Fails with [`Error::Decode`] when the file is missing, is not a
    /// regular file, no reader accepts it, or its layout is unexpected.
    pub fn decode(&self, path: &Path) -> Result<Vec<Instance>> {
        if !path.exists() {
            return Err(Error::decode(path, "file does not exist"));
        }
        if !path.is_file() {
            return Err(Error::decode(path, "not a regular file"));
        }

        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if let Some(reader) = self.readers.get(&extension) {
            return reader.read_instances(path);
        }

        // Fall back to header detection
        if let Some(reader) = self.readers.values().find(|reader| reader.can_read(path)) {
            debug!("Decoding {} as {} by header", path.display(), reader.format_name());
            return reader.read_instances(path);
        }

        Err(Error::decode(
            path,
            format!("no reader registered for extension '{}'", extension),
        ))
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::with_defaults(crate::DEFAULT_DATASET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcannotate_core::Point3f;
    use std::fs;

    struct FixedReader;

    impl InstanceReader for FixedReader {
        fn read_instances(&self, _path: &Path) -> Result<Vec<Instance>> {
            Ok(vec![Instance::from_points(vec![Point3f::new(1.0, 2.0, 3.0)])])
        }

        fn can_read(&self, path: &Path) -> bool {
            fs::read(path).map(|bytes| bytes.starts_with(b"FIXED")).unwrap_or(false)
        }

        fn format_name(&self) -> &'static str {
            "fixed"
        }

        fn extensions(&self) -> &[&'static str] {
            &["fix", "FXD"]
        }
    }

    #[test]
    fn test_register_lowercases_extensions() {
        let mut registry = ReaderRegistry::new();
        registry.register(FixedReader);
        assert_eq!(registry.extensions().collect::<Vec<_>>(), vec!["fix", "fxd"]);
        assert_eq!(registry.reader_for(".FXD").unwrap().format_name(), "fixed");
    }

    #[test]
    fn test_decode_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cloud.fix");
        fs::write(&path, b"anything").unwrap();

        let mut registry = ReaderRegistry::new();
        registry.register(FixedReader);
        let instances = registry.decode(&path).unwrap();
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0][0], Point3f::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_decode_by_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cloud.bin");
        fs::write(&path, b"FIXED data").unwrap();

        let mut registry = ReaderRegistry::new();
        registry.register(FixedReader);
        assert_eq!(registry.decode(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_decode_rejects_missing_directory_and_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ReaderRegistry::new();

        let missing = registry.decode(&dir.path().join("missing.fix")).unwrap_err();
        assert!(matches!(missing, Error::Decode { .. }));

        let not_file = registry.decode(dir.path()).unwrap_err();
        assert!(matches!(not_file, Error::Decode { .. }));

        let unknown = dir.path().join("cloud.bin");
        fs::write(&unknown, b"???").unwrap();
        assert!(matches!(registry.decode(&unknown).unwrap_err(), Error::Decode { .. }));
    }
}
