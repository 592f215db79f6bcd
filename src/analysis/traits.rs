//! Analysis trait abstractions
//!
//! Pitch estimation is an external concern: the key analysis only needs a
//! hertz reading per frame, so the detector sits behind this trait and can
//! be swapped without touching the pipeline.

/// Per-frame fundamental frequency estimator
pub trait FramePitchEstimator {
    /// Fundamental frequency of one mono frame in Hz, or `None` when the
    /// frame carries no clear pitch
    fn estimate(&mut self, frame: &[f32]) -> Option<f64>;

    /// Number of samples the estimator expects per frame
    fn frame_size(&self) -> usize;

    /// Get the name of this estimator (for logging)
    fn name(&self) -> &'static str;
}
