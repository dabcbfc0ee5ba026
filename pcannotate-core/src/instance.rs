//! Instance identifiers

use std::fmt;
use std::path::{Component, Path};

/// Composite key of an instance: the data file it came from and its position
/// inside that file.
///
/// The string form `"<file>_<index>"` is the key used in the annotation log,
/// so it has to stay stable across runs and platforms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId {
    pub file: String,
    pub index: usize,
}

impl InstanceId {
    pub fn new(file: impl Into<String>, index: usize) -> Self {
        Self {
            file: file.into(),
            index,
        }
    }

    /// Build an id for the `index`-th instance of `path`, naming the file
    /// relative to `root` with `/` separators.
    ///
    /// A path outside of `root` keeps its full form.
    pub fn relative_to(root: &Path, path: &Path, index: usize) -> Self {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let file = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                Component::RootDir => Some(String::new()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        Self::new(file, index)
    }

    /// Key under which this instance is stored in the annotation log
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.file, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_key_format() {
        assert_eq!(InstanceId::new("scene/a.h5", 3).key(), "scene/a.h5_3");
    }

    #[test]
    fn test_relative_to_strips_root() {
        let root = PathBuf::from("/data/clouds");
        let path = root.join("batch1").join("part.h5");
        let id = InstanceId::relative_to(&root, &path, 0);
        assert_eq!(id.file, "batch1/part.h5");
        assert_eq!(id.key(), "batch1/part.h5_0");
    }

    #[test]
    fn test_relative_to_outside_root_keeps_path() {
        let id = InstanceId::relative_to(Path::new("/data"), Path::new("/other/x.h5"), 1);
        assert_eq!(id.key(), "/other/x.h5_1");
    }
}
