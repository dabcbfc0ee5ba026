//! Command-line front ends for pcannotate
//!
//! `pcannotate` walks a data directory and records one label per instance;
//! `pcbrowse` pages through the instances of a single file.

use clap::Parser;
use pcannotate_core::{AnnotateAction, BrowseAction, KeyMap, PointStyle, Result};
use pcannotate_io::{InstanceSource, ReaderRegistry, DEFAULT_DATASET, DEFAULT_EXTENSION};
use std::path::PathBuf;
use std::str::FromStr;

/// Label every point cloud instance found under a data directory
#[derive(Debug, Parser)]
#[command(name = "pcannotate", version)]
pub struct AnnotateArgs {
    /// Directory searched recursively for data files
    #[arg(long = "data_dir")]
    pub data_dir: PathBuf,

    /// JSON file the labels are written to; created when missing
    #[arg(long = "annotation_log")]
    pub annotation_log: PathBuf,

    /// Extension of the data files
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    pub ext: String,

    /// Dataset holding the instances inside HDF5 files
    #[arg(long, default_value = DEFAULT_DATASET)]
    pub dataset: String,

    /// Key binding as KEY=ACTION (take, leave, end). Replaces the default
    /// bindings when given
    #[arg(long = "key", value_name = "KEY=ACTION")]
    pub keys: Vec<String>,

    /// Rendered point size in pixels
    #[arg(long, default_value_t = PointStyle::annotation().size)]
    pub point_size: f32,
}

impl AnnotateArgs {
    pub fn key_map(&self) -> Result<KeyMap<AnnotateAction>> {
        key_map(&self.keys)
    }

    pub fn source(&self) -> InstanceSource {
        InstanceSource::with_registry(
            &self.data_dir,
            self.ext.as_str(),
            ReaderRegistry::with_defaults(&self.dataset),
        )
    }

    pub fn style(&self) -> PointStyle {
        PointStyle::annotation().with_size(self.point_size)
    }
}

/// Page through the point cloud instances of one file
#[derive(Debug, Parser)]
#[command(name = "pcbrowse", version)]
pub struct BrowseArgs {
    /// Data file to browse
    #[arg(long)]
    pub file: PathBuf,

    /// Dataset holding the instances inside HDF5 files
    #[arg(long, default_value = DEFAULT_DATASET)]
    pub dataset: String,

    /// Key binding as KEY=ACTION (next, previous, quit). Replaces the
    /// default bindings when given
    #[arg(long = "key", value_name = "KEY=ACTION")]
    pub keys: Vec<String>,

    /// Rendered point size in pixels
    #[arg(long, default_value_t = PointStyle::browsing().size)]
    pub point_size: f32,
}

impl BrowseArgs {
    pub fn key_map(&self) -> Result<KeyMap<BrowseAction>> {
        key_map(&self.keys)
    }

    pub fn registry(&self) -> ReaderRegistry {
        ReaderRegistry::with_defaults(&self.dataset)
    }

    pub fn style(&self) -> PointStyle {
        PointStyle::browsing().with_size(self.point_size)
    }
}

/// Parse `entries`, falling back to the default map when there are none
pub fn key_map<A>(entries: &[String]) -> Result<KeyMap<A>>
where
    A: Copy + FromStr<Err = pcannotate_core::Error>,
    KeyMap<A>: Default,
{
    if entries.is_empty() {
        Ok(KeyMap::default())
    } else {
        KeyMap::parse(entries)
    }
}

/// Install the logger, `info` unless `RUST_LOG` says otherwise
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcannotate_core::Label;

    #[test]
    fn test_annotate_args_defaults() {
        let args = AnnotateArgs::try_parse_from([
            "pcannotate",
            "--data_dir",
            "data",
            "--annotation_log",
            "log.json",
        ])
        .unwrap();

        assert_eq!(args.data_dir, PathBuf::from("data"));
        assert_eq!(args.annotation_log, PathBuf::from("log.json"));
        assert_eq!(args.ext, DEFAULT_EXTENSION);
        assert_eq!(args.dataset, "train/clouds");
        assert_eq!(args.key_map().unwrap(), KeyMap::default());
        assert_eq!(args.style(), PointStyle::annotation());
    }

    #[test]
    fn test_annotate_args_require_paths() {
        assert!(AnnotateArgs::try_parse_from(["pcannotate", "--data_dir", "data"]).is_err());
    }

    #[test]
    fn test_custom_keys_replace_defaults() {
        let args = AnnotateArgs::try_parse_from([
            "pcannotate",
            "--data_dir",
            "data",
            "--annotation_log",
            "log.json",
            "--key",
            "y=take",
            "--key",
            "n=leave",
            "--key",
            "x=end",
        ])
        .unwrap();

        let map = args.key_map().unwrap();
        assert_eq!(map.action('y'), Some(AnnotateAction::Label(Label::Take)));
        assert_eq!(map.action('x'), Some(AnnotateAction::End));
        assert_eq!(map.action('1'), None);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_bad_key_binding_is_rejected() {
        let args = BrowseArgs::try_parse_from(["pcbrowse", "--file", "a.h5", "--key", "1=jump"])
            .unwrap();
        assert!(args.key_map().is_err());
    }

    #[test]
    fn test_browse_args() {
        let args = BrowseArgs::try_parse_from([
            "pcbrowse",
            "--file",
            "a.csv",
            "--point-size",
            "5",
        ])
        .unwrap();

        assert_eq!(args.file, PathBuf::from("a.csv"));
        assert_eq!(args.key_map().unwrap(), KeyMap::default());
        assert_eq!(args.style().size, 5.0);
        assert_eq!(args.style().color, PointStyle::browsing().color);
    }
}
