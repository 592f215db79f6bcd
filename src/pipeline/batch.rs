//! Batch pipeline
//!
//! Discovers input files, analyzes them in parallel (one independent
//! analysis run per file) and exports the results.

use crate::analysis::{McLeodEstimator, NoteQuantizer, PitchTrack};
use crate::audio::FrameReader;
use crate::config::Settings;
use crate::discovery;
use crate::error::{Result, WavkeyError};
use crate::export;
use crate::pipeline::orchestrator::AnalysisOrchestrator;
use crate::types::{AnalysisReport, FileReport};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Pipeline result summary
#[derive(Debug)]
pub struct PipelineResult {
    pub total_files: usize,
    /// Files for which a key was estimated
    pub successful: usize,
    /// Files that decoded fine but carried no usable pitch
    pub no_pitch_data: usize,
    /// Files skipped for recoverable reasons (unsupported, unreadable)
    pub skipped: usize,
    /// Files that failed for any other reason
    pub failed: usize,
    /// Per-file outcomes, in input order
    pub reports: Vec<FileReport>,
}

/// Run the full analysis pipeline
pub fn run(settings: &Settings) -> Result<PipelineResult> {
    let pipeline_start = Instant::now();

    settings.validate()?;
    configure_thread_pool(settings.analysis_threads)?;

    let orchestrator = AnalysisOrchestrator::new(
        NoteQuantizer::new(settings.concert_pitch_hz)?,
        settings.load_key_table()?,
        settings.top_n,
    );
    debug!(
        "Matching against {} key signatures",
        orchestrator.signatures().len()
    );

    // Phase 1: Discovery
    info!("Scanning for audio files...");
    let mut outcomes: Vec<(PathBuf, Result<AnalysisReport>)> = Vec::new();
    let mut files: Vec<PathBuf> = Vec::new();
    for input in &settings.inputs {
        match discovery::scan(input, settings.recursive) {
            Ok(found) => files.extend(found),
            Err(e) if e.is_recoverable() => outcomes.push((input.clone(), Err(e))),
            Err(e) => return Err(e),
        }
    }

    info!("Analyzing {} files", files.len());

    // Phase 2: Analysis
    let analysis_start = Instant::now();
    let analyzed: Vec<(PathBuf, Result<AnalysisReport>)> = files
        .par_iter()
        .map(|path| {
            let outcome = analyze_file(path, &orchestrator, settings);
            (path.clone(), outcome)
        })
        .collect();
    outcomes.extend(analyzed);
    info!(
        "Analysis completed in {:.2}s",
        analysis_start.elapsed().as_secs_f64()
    );

    let mut result = PipelineResult {
        total_files: outcomes.len(),
        successful: 0,
        no_pitch_data: 0,
        skipped: 0,
        failed: 0,
        reports: Vec::with_capacity(outcomes.len()),
    };

    for (path, outcome) in outcomes {
        let report = match outcome {
            Ok(report) => {
                result.successful += 1;
                FileReport {
                    path,
                    report: Some(report),
                    error: None,
                }
            }
            Err(e) => {
                match &e {
                    WavkeyError::NoPitchData => {
                        info!("{}: {}", path.display(), e);
                        result.no_pitch_data += 1;
                    }
                    _ if e.is_recoverable() => {
                        warn!("Skipping {}: {}", path.display(), e);
                        result.skipped += 1;
                    }
                    _ => {
                        error!("Failed {}: {}", path.display(), e);
                        result.failed += 1;
                    }
                }
                FileReport {
                    path,
                    report: None,
                    error: Some(e.to_string()),
                }
            }
        };
        result.reports.push(report);
    }

    // Phase 3: Export
    if let Some(json_path) = &settings.json_output {
        export::write_json(&result.reports, json_path)?;
    }

    info!(
        "Total pipeline time: {:.2}s",
        pipeline_start.elapsed().as_secs_f64()
    );

    Ok(result)
}

/// Decode, track pitch and estimate the key of a single file
pub fn analyze_file(
    path: &Path,
    orchestrator: &AnalysisOrchestrator,
    settings: &Settings,
) -> Result<AnalysisReport> {
    debug!("Analyzing: {}", path.display());

    let frames = FrameReader::open(path, settings.detector.frame_size)?;
    let estimator = McLeodEstimator::new(frames.sample_rate(), settings.detector);
    let mut track = PitchTrack::new(frames, estimator);

    let outcome = orchestrator.analyze(&mut track);

    // A decode failure outranks whatever the partial stream produced
    if let Some(e) = track.take_error() {
        return Err(e);
    }

    debug!(
        "{}: {} frames, {} voiced",
        path.display(),
        track.frames_read(),
        track.voiced_frames()
    );

    outcome
}

/// Configure the Rayon thread pool
fn configure_thread_pool(num_threads: usize) -> Result<()> {
    match rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
    {
        Ok(()) => {
            debug!("Configured thread pool with {} threads", num_threads);
        }
        Err(e) => {
            // If the pool is already initialized (e.g., in tests), that's OK
            if e.to_string().contains("already been initialized") {
                debug!("Thread pool already initialized, using existing pool");
            } else {
                return Err(WavkeyError::Config(format!(
                    "Failed to configure thread pool: {}",
                    e
                )));
            }
        }
    }
    Ok(())
}
