//! Plain-text instance tables
//!
//! Each non-empty line holds one instance as a flat row of coordinates
//! (`x0 y0 z0 x1 y1 z1 ...`), the text counterpart of one row of an HDF5
//! instance table. Lines starting with `#` are comments. The delimiter
//! (comma, space, tab or semicolon) is detected per line.

use pcannotate_core::{Error, Instance, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::registry::InstanceReader;

/// Supported delimiters for row files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Space,
    Tab,
    Semicolon,
}

impl Delimiter {
    /// Get the character representation of the delimiter
    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Space => ' ',
            Delimiter::Tab => '\t',
            Delimiter::Semicolon => ';',
        }
    }

    /// Detect delimiter from a line of text
    pub fn detect_from_line(line: &str) -> Option<Self> {
        let counts = [
            (line.matches(',').count(), Delimiter::Comma),
            (line.matches(' ').count(), Delimiter::Space),
            (line.matches('\t').count(), Delimiter::Tab),
            (line.matches(';').count(), Delimiter::Semicolon),
        ];

        // First delimiter wins a tie, so "1, 2, 3" splits on commas
        counts
            .iter()
            .filter(|(count, _)| *count > 0)
            .fold(None, |best: Option<(usize, Delimiter)>, &(count, delimiter)| match best {
                Some((best_count, _)) if best_count >= count => best,
                _ => Some((count, delimiter)),
            })
            .map(|(_, delimiter)| delimiter)
    }
}

/// Reader for `.csv`/`.txt` instance tables
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvRowsReader;

impl CsvRowsReader {
    pub fn new() -> Self {
        Self
    }

    /// Parse one line into its flat coordinate row
    fn parse_row(line: &str, line_number: usize, path: &Path) -> Result<Vec<f32>> {
        let delimiter = Delimiter::detect_from_line(line).unwrap_or(Delimiter::Space);
        line.split(delimiter.as_char())
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(|field| {
                field.parse::<f32>().map_err(|e| {
                    Error::decode(
                        path,
                        format!("line {}: invalid coordinate '{}': {}", line_number, field, e),
                    )
                })
            })
            .collect()
    }
}

impl InstanceReader for CsvRowsReader {
    fn read_instances(&self, path: &Path) -> Result<Vec<Instance>> {
        let reader = BufReader::new(File::open(path)?);
        let mut instances = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                Error::decode(path, format!("line {}: unreadable text: {}", i + 1, e))
            })?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let row = Self::parse_row(line, i + 1, path)?;
            instances.push(Instance::from_flat(&row, path)?);
        }

        Ok(instances)
    }

    fn can_read(&self, path: &Path) -> bool {
        let Ok(file) = File::open(path) else {
            return false;
        };
        BufReader::new(file)
            .lines()
            .map_while(|line| line.ok())
            .find(|line| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with('#')
            })
            .map(|line| Self::parse_row(line.trim(), 1, path).is_ok())
            .unwrap_or(false)
    }

    fn format_name(&self) -> &'static str {
        "csv-rows"
    }

    fn extensions(&self) -> &[&'static str] {
        &["csv", "txt"]
    }
}
