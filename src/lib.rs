//! wavkey - Musical key estimation from pitch histograms
//!
//! Samples the fundamental pitch of a recording frame by frame, snaps each
//! reading to the nearest semitone, counts how often every pitch class
//! occurs and matches the most frequent ones against a table of key
//! signatures. The average deviation from equal temperament is reported as
//! the tuning offset.
//!
//! # Architecture
//!
//! - `analysis`: note quantization, pitch histogram, key matching and the
//!   frame pitch tracker
//! - `audio`: streaming decode into fixed-size frames using symphonia
//! - `pipeline`: the per-clip [`AnalysisOrchestrator`] and the parallel batch run
//! - `discovery`: input file scanning
//! - `config`: CLI argument parsing and runtime settings
//! - `export`: JSON reports
//!
//! # Example
//!
//! ```
//! use wavkey::AnalysisOrchestrator;
//!
//! // Pitch readings in Hz, one per frame; 0.0 means no pitch detected
//! let readings = [261.63, 0.0, 329.63, 392.0, 261.63];
//! let report = AnalysisOrchestrator::default().analyze(readings).unwrap();
//! assert_eq!(report.key_name, "C Major");
//! ```

pub mod analysis;
pub mod audio;
pub mod config;
pub mod discovery;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod types;

// Re-export key types at crate root
pub use error::{Result, WavkeyError};
pub use pipeline::AnalysisOrchestrator;
pub use types::{AnalysisReport, FileReport, KeyMatchResult, PitchClass};
