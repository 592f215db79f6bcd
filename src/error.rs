//! Unified error types for wavkey
//!
//! Error strategy:
//! - Core contract violations (invalid pitch, empty histogram): should never
//!   surface to a user when inputs are filtered correctly
//! - No pitch data: an expected outcome for silent or unpitched audio
//! - Per-file errors (decode, format): recoverable, skip and continue
//! - System errors (output, configuration): fatal, abort batch

use std::path::PathBuf;
use thiserror::Error;

/// Supported audio formats for helpful error messages
pub const SUPPORTED_FORMATS: &str = "WAV, FLAC, MP3";

/// Top-level error type for wavkey operations
#[derive(Debug, Error)]
pub enum WavkeyError {
    // =========================================================================
    // Core analysis errors
    // =========================================================================
    #[error("Invalid pitch {hz} Hz: pitch must be positive and finite")]
    InvalidPitch { hz: f64 },

    #[error("Pitch histogram is empty: no samples have been recorded")]
    EmptyHistogram,

    #[error("No significant pitch data found. Key analysis failed.")]
    NoPitchData,

    // =========================================================================
    // Recoverable errors - skip file, continue batch
    // =========================================================================
    #[error("Failed to decode audio file '{path}': {reason}\n  Supported formats: {SUPPORTED_FORMATS}")]
    Decode { path: PathBuf, reason: String },

    #[error("Unsupported audio format for '{path}': {format}\n  Supported formats: {SUPPORTED_FORMATS}")]
    UnsupportedFormat { path: PathBuf, format: String },

    #[error("File not found: '{0}'\n  Tip: Check the path exists and is accessible")]
    FileNotFound(PathBuf),

    // =========================================================================
    // Fatal errors - abort entire batch
    // =========================================================================
    #[error("Cannot write output to '{path}': {reason}\n  Tip: Check write permissions for the output directory")]
    Output { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for wavkey operations
pub type Result<T> = std::result::Result<T, WavkeyError>;

impl WavkeyError {
    /// Returns true if this error is recoverable (record it for the file, continue batch)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WavkeyError::NoPitchData
                | WavkeyError::Decode { .. }
                | WavkeyError::UnsupportedFormat { .. }
                | WavkeyError::FileNotFound(_)
        )
    }

    /// Create a decode error with context about the issue
    pub fn decode(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        WavkeyError::Decode {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an output error, checking for common issues
    pub fn output(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        let reason = match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                format!("Permission denied. Check that you have write access to {}", path.display())
            }
            std::io::ErrorKind::NotFound => {
                format!(
                    "Directory does not exist: {}",
                    path.parent().map(|p| p.display().to_string()).unwrap_or_default()
                )
            }
            _ => err.to_string(),
        };
        WavkeyError::Output { path, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_pitch_data_is_recoverable() {
        assert!(WavkeyError::NoPitchData.is_recoverable());
        assert!(WavkeyError::decode("a.wav", "bad header").is_recoverable());
    }

    #[test]
    fn test_fatal_errors_are_not_recoverable() {
        assert!(!WavkeyError::Config("frame size".into()).is_recoverable());
        assert!(!WavkeyError::InvalidPitch { hz: -1.0 }.is_recoverable());
        let err = WavkeyError::output(
            "/out/report.json",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("Permission denied"));
    }
}
