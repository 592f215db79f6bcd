//! Frame-wise pitch tracking
//!
//! Turns a stream of decoded audio frames into a stream of pitch readings,
//! one per frame, using the McLeod pitch method from `pitch-detection`.
//! Frames without a detectable pitch yield `0.0`, which the analysis skips.

use crate::analysis::traits::FramePitchEstimator;
use crate::error::{Result, WavkeyError};
use pitch_detection::detector::mcleod::McLeodDetector;
use pitch_detection::detector::PitchDetector;
use tracing::{debug, trace};

/// Reading emitted for frames with no detectable pitch
pub const NO_PITCH: f64 = 0.0;

/// Default minimum mean square per sample
pub const DEFAULT_POWER_THRESHOLD: f64 = 1e-4;

/// Detector parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    /// Samples per analysis frame; frames do not overlap (default: 1024)
    pub frame_size: usize,
    /// Minimum mean square per sample for a frame to be analyzed
    /// (default: 1e-4, an RMS of -40 dBFS). Independent of the frame size.
    pub power_threshold: f64,
    /// Minimum normalized clarity of a pitch peak (default: 0.7)
    pub clarity_threshold: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            frame_size: 1024,
            power_threshold: DEFAULT_POWER_THRESHOLD,
            clarity_threshold: 0.7,
        }
    }
}

/// McLeod (NSDF) pitch estimator
pub struct McLeodEstimator {
    detector: McLeodDetector<f64>,
    signal: Vec<f64>,
    sample_rate: u32,
    config: DetectorConfig,
}

impl McLeodEstimator {
    pub fn new(sample_rate: u32, config: DetectorConfig) -> Self {
        Self {
            detector: McLeodDetector::new(config.frame_size, config.frame_size / 2),
            signal: vec![0.0; config.frame_size],
            sample_rate,
            config,
        }
    }
}

impl FramePitchEstimator for McLeodEstimator {
    fn estimate(&mut self, frame: &[f32]) -> Option<f64> {
        // The detector needs exactly frame_size samples; short frames are zero padded
        self.signal.fill(0.0);
        for (dst, src) in self.signal.iter_mut().zip(frame) {
            *dst = f64::from(*src);
        }

        // The detector gates on the frame's total power (sum of squares)
        let frame_power = self.config.power_threshold * self.config.frame_size as f64;

        self.detector
            .get_pitch(
                &self.signal,
                self.sample_rate as usize,
                frame_power,
                self.config.clarity_threshold,
            )
            .map(|pitch| pitch.frequency)
            .filter(|hz| hz.is_finite() && *hz > 0.0)
    }

    fn frame_size(&self) -> usize {
        self.config.frame_size
    }

    fn name(&self) -> &'static str {
        "mcleod"
    }
}

/// Lazy sequence of pitch readings, one per frame
///
/// Frames arrive as `Result`s; the first error ends the sequence and is kept
/// for the caller to collect with [`PitchTrack::take_error`] once the
/// consumer is done.
pub struct PitchTrack<I, E> {
    frames: I,
    estimator: E,
    frames_read: usize,
    voiced_frames: usize,
    error: Option<WavkeyError>,
}

impl<I, E> PitchTrack<I, E>
where
    I: Iterator<Item = Result<Vec<f32>>>,
    E: FramePitchEstimator,
{
    pub fn new(frames: I, estimator: E) -> Self {
        debug!(
            "Tracking pitch with {} ({} samples per frame)",
            estimator.name(),
            estimator.frame_size()
        );
        Self {
            frames,
            estimator,
            frames_read: 0,
            voiced_frames: 0,
            error: None,
        }
    }

    /// Frames pulled from the source so far
    pub fn frames_read(&self) -> usize {
        self.frames_read
    }

    /// Frames in which a pitch was detected
    pub fn voiced_frames(&self) -> usize {
        self.voiced_frames
    }

    /// Error that cut the sequence short, if any
    pub fn take_error(&mut self) -> Option<WavkeyError> {
        self.error.take()
    }
}

impl<I, E> Iterator for PitchTrack<I, E>
where
    I: Iterator<Item = Result<Vec<f32>>>,
    E: FramePitchEstimator,
{
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.error.is_some() {
            return None;
        }

        match self.frames.next()? {
            Ok(frame) => {
                self.frames_read += 1;
                match self.estimator.estimate(&frame) {
                    Some(hz) => {
                        self.voiced_frames += 1;
                        Some(hz)
                    }
                    None => {
                        trace!("Frame {}: no pitch", self.frames_read);
                        Some(NO_PITCH)
                    }
                }
            }
            Err(e) => {
                self.error = Some(e);
                None
            }
        }
    }
}
