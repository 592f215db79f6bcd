//! JSON export of analysis reports

use crate::error::{Result, WavkeyError};
use crate::types::FileReport;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

/// JSON output schema version
const SCHEMA_VERSION: &str = "1.0";

/// Top-level JSON output structure
#[derive(Debug, Serialize, Deserialize)]
pub struct WavkeyJson {
    /// Schema version for forward compatibility
    pub version: String,
    /// Export metadata
    pub metadata: ExportMetadata,
    /// One entry per input file
    pub files: Vec<FileReport>,
}

/// Export metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// wavkey version that generated this file
    pub generator_version: String,
    /// Timestamp of export
    pub exported_at: String,
    /// Number of files
    pub file_count: usize,
}

/// Write per-file reports to a JSON file
///
/// Writes to a temp file next to the target and renames it into place, so
/// an interrupted write never leaves a truncated report behind.
pub fn write_json(reports: &[FileReport], output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| WavkeyError::output(parent, e))?;
        }
    }

    let temp_path = output_path.with_extension("json.tmp");

    let file = File::create(&temp_path).map_err(|e| WavkeyError::Output {
        path: output_path.to_path_buf(),
        reason: format!("Failed to create temp file: {}", e),
    })?;

    let output = WavkeyJson {
        version: SCHEMA_VERSION.to_string(),
        metadata: ExportMetadata {
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: chrono::Utc::now().to_rfc3339(),
            file_count: reports.len(),
        },
        files: reports.to_vec(),
    };

    serde_json::to_writer_pretty(BufWriter::new(file), &output).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        WavkeyError::Output {
            path: output_path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    std::fs::rename(&temp_path, output_path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        WavkeyError::Output {
            path: output_path.to_path_buf(),
            reason: format!("Failed to finalize file: {}", e),
        }
    })?;

    info!("Wrote {} reports to {}", reports.len(), output_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AnalysisReport;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_write_json_round_trips_reports() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("keys.json");

        let reports = vec![
            FileReport {
                path: PathBuf::from("triad.wav"),
                report: Some(AnalysisReport {
                    key_name: "C Major".to_string(),
                    match_count: 3,
                    average_cents_offset: 1.5,
                    cents_std_dev: 0.5,
                    top_notes: vec!["C".into(), "E".into(), "G".into()],
                    voiced_samples: 30,
                    total_samples: 32,
                }),
                error: None,
            },
            FileReport {
                path: PathBuf::from("silence.wav"),
                report: None,
                error: Some("No significant pitch data found. Key analysis failed.".into()),
            },
        ];

        write_json(&reports, &path).unwrap();
        assert!(!path.with_extension("json.tmp").exists());

        let parsed: WavkeyJson =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.version, SCHEMA_VERSION);
        assert_eq!(parsed.metadata.file_count, 2);
        assert_eq!(
            parsed.files[0].report.as_ref().unwrap().key_name,
            "C Major"
        );
        assert!(parsed.files[1].report.is_none());
        assert!(parsed.files[1].error.is_some());
    }
}
