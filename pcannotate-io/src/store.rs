//! Annotation log persistence
//!
//! The log is a single JSON object mapping instance ids to labels. It is
//! rewritten in full on every change, with no temporary file and no backup,
//! so only one session may write a given log at a time. A log that fails to
//! parse is discarded and the store starts empty.

use indexmap::IndexMap;
use log::{info, warn};
use pcannotate_core::{Error, InstanceId, Label, Result};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Labels recorded so far, in the order they were first recorded
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationStore {
    path: PathBuf,
    entries: IndexMap<String, String>,
}

impl AnnotationStore {
    /// Empty store persisting to `path`
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: IndexMap::new(),
        }
    }

    /// Create the log file if it does not exist yet, then load it
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            OpenOptions::new().create(true).append(true).open(&path)?;
        }
        Self::load(path)
    }

    /// Load the log at `path`.
    ///
    /// A missing, empty or malformed log yields an empty store; only a log
    /// that exists but cannot be read is an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            warn!("Annotation log '{}' does not exist. Starting fresh.", path.display());
            return Ok(Self::empty(path));
        }

        let content = fs::read(&path)?;
        if content.iter().all(u8::is_ascii_whitespace) {
            warn!("Annotation log '{}' is empty. Starting fresh.", path.display());
            return Ok(Self::empty(path));
        }

        // Invalid UTF-8 fails here too, like any other malformed JSON
        match serde_json::from_slice::<IndexMap<String, String>>(&content) {
            Ok(entries) => {
                info!("Loaded {} annotations from '{}'", entries.len(), path.display());
                Ok(Self { path, entries })
            }
            Err(e) => {
                let corrupt = Error::PersistenceCorrupt {
                    path: path.clone(),
                    message: e.to_string(),
                };
                warn!("{}. Starting fresh.", corrupt);
                Ok(Self::empty(path))
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, id: &InstanceId) -> bool {
        self.contains_key(&id.key())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Raw stored value, which may be a label this build no longer knows
    pub fn get(&self, id: &InstanceId) -> Option<&str> {
        self.entries.get(&id.key()).map(String::as_str)
    }

    /// Stored label of `id`, if it parses as one
    pub fn label(&self, id: &InstanceId) -> Option<Label> {
        self.get(id).and_then(|value| value.parse().ok())
    }

    /// Record `label` for `id`, returning the previous value.
    ///
    /// Relabeling keeps the entry's original position.
    pub fn insert(&mut self, id: &InstanceId, label: Label) -> Option<String> {
        self.entries.insert(id.key(), label.to_string())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Overwrite the log with the whole store, pretty-printed
    pub fn save(&self) -> Result<()> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.entries.serialize(&mut serializer)?;
        fs::write(&self.path, buf)?;
        info!("Saved {} annotations to '{}'", self.entries.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_log_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.json");
        let store = AnnotationStore::load(&path).unwrap();
        assert!(store.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_open_creates_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.json");
        let store = AnnotationStore::open(&path).unwrap();
        assert!(store.is_empty());
        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_corrupt_log_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.json");
        fs::write(&path, "{\"a.h5_0\": \"take\",").unwrap();
        assert!(AnnotationStore::load(&path).unwrap().is_empty());

        fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(AnnotationStore::load(&path).unwrap().is_empty());

        fs::write(&path, "{\"a.h5_0\": 1}").unwrap();
        assert!(AnnotationStore::load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_log_cut_inside_multibyte_char_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.json");
        fs::write(&path, b"{\n    \"sc\xc3").unwrap();
        assert!(AnnotationStore::load(&path).unwrap().is_empty());

        fs::write(&path, b"{\"\xff.h5_0\": \"take\"}").unwrap();
        let store = AnnotationStore::open(&path).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn test_whitespace_only_log_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.json");
        fs::write(&path, " \n\t\n").unwrap();
        assert!(AnnotationStore::load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_save_and_reload_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.json");

        let mut store = AnnotationStore::empty(&path);
        store.insert(&InstanceId::new("b.h5", 0), Label::Take);
        store.insert(&InstanceId::new("a.h5", 1), Label::Leave);
        store.save().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n    \"b.h5_0\": \"take\",\n    \"a.h5_1\": \"leave\"\n}");

        let reloaded = AnnotationStore::load(&path).unwrap();
        assert_eq!(reloaded, store);
        assert_eq!(reloaded.label(&InstanceId::new("a.h5", 1)), Some(Label::Leave));
    }

    #[test]
    fn test_unknown_labels_survive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.json");
        fs::write(&path, "{\"a.h5_0\": \"maybe\"}").unwrap();

        let mut store = AnnotationStore::load(&path).unwrap();
        let id = InstanceId::new("a.h5", 0);
        assert!(store.contains(&id));
        assert_eq!(store.get(&id), Some("maybe"));
        assert_eq!(store.label(&id), None);

        store.insert(&InstanceId::new("a.h5", 1), Label::Take);
        store.save().unwrap();
        let reloaded = AnnotationStore::load(&path).unwrap();
        assert_eq!(reloaded.get(&id), Some("maybe"));
        assert_eq!(reloaded.len(), 2);
    }
}
