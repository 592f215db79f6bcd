//! Pipeline orchestration
//!
//! [`AnalysisOrchestrator`] runs the key analysis for one stream of pitch
//! readings; [`run`] applies it to every input file.

pub mod batch;
pub mod orchestrator;

pub use batch::{analyze_file, run, PipelineResult};
pub use orchestrator::{AnalysisOrchestrator, DEFAULT_TOP_NOTES};
