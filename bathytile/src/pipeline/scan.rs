//! Tile discovery.
//!
//! Scans the input directory for tile feature files named
//! `{zoom}.{x}.{y}.geojson` and parses the address out of the file name.
//! Files that do not match the pattern are ignored. Results are sorted by
//! address so runs are deterministic regardless of directory iteration
//! order.

use super::{PipelineError, TileError};
use crate::coord::TileAddress;
use crate::geojson::FeatureCollection;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// A discovered tile: its address and the file backing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSource {
    pub address: TileAddress,
    pub path: PathBuf,
}

impl TileSource {
    /// Reads and parses the backing GeoJSON file.
    pub fn load(&self) -> Result<FeatureCollection, TileError> {
        let text = fs::read_to_string(&self.path).map_err(|source| TileError::ReadFailed {
            path: self.path.clone(),
            source,
        })?;
        FeatureCollection::from_json(&text).map_err(|source| TileError::ParseFailed {
            path: self.path.clone(),
            source,
        })
    }
}

/// Scans `input_dir` for tile feature files.
///
/// A directory that cannot be read at all is a run-level failure; an
/// individual unreadable entry name simply does not match and is skipped.
pub fn scan_tiles(input_dir: &Path) -> Result<Vec<TileSource>, PipelineError> {
    let name_pattern = Regex::new(r"^(\d+)\.(\d+)\.(\d+)\.geojson$").expect("valid regex");

    let entries = fs::read_dir(input_dir).map_err(|source| PipelineError::ScanFailed {
        path: input_dir.to_path_buf(),
        source,
    })?;

    let mut sources = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PipelineError::ScanFailed {
            path: input_dir.to_path_buf(),
            source,
        })?;

        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some(captures) = name_pattern.captures(name) else {
            continue;
        };

        // Components that overflow their types are not valid addresses.
        let (Ok(zoom), Ok(x), Ok(y)) = (
            captures[1].parse::<u8>(),
            captures[2].parse::<u32>(),
            captures[3].parse::<u32>(),
        ) else {
            continue;
        };

        sources.push(TileSource {
            address: TileAddress::new(zoom, x, y),
            path: entry.path(),
        });
    }

    sources.sort_by_key(|source| (source.address.zoom, source.address.x, source.address.y));
    Ok(sources)
}
