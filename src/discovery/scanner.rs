//! File discovery and scanning

use crate::error::{Result, WavkeyError};
use crate::types::AudioFormat;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Scan a path (file or directory) for audio files
///
/// A file given explicitly must have a supported extension. Directory
/// results are sorted by file name so batch output order is stable.
pub fn scan(input: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !input.exists() {
        return Err(WavkeyError::FileNotFound(input.to_path_buf()));
    }

    if input.is_file() {
        if !AudioFormat::is_supported_path(input) {
            return Err(WavkeyError::UnsupportedFormat {
                path: input.to_path_buf(),
                format: input
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            });
        }
        return Ok(vec![input.to_path_buf()]);
    }

    let walker = if recursive {
        WalkDir::new(input)
    } else {
        WalkDir::new(input).max_depth(1)
    };

    let files: Vec<PathBuf> = walker
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file() && AudioFormat::is_supported_path(e.path()))
        .map(|e| {
            debug!("Discovered: {}", e.path().display());
            e.into_path()
        })
        .collect();

    info!("Discovered {} audio files in {}", files.len(), input.display());

    if files.is_empty() {
        warn!("No supported audio files found in {}", input.display());
    }

    Ok(files)
}
