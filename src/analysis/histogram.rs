//! Pitch-class occurrence histogram
//!
//! Counts how often each semitone was heard and keeps every tuning offset so
//! the run's tuning statistics can be computed at the end.

use crate::error::{Result, WavkeyError};
use crate::types::PitchClass;

/// Occurrence counts per pitch class plus the log of cents offsets
///
/// One histogram belongs to exactly one analysis run.
#[derive(Debug, Clone, Default)]
pub struct PitchHistogram {
    counts: [usize; 12],
    /// Pitch classes in the order they were first recorded (tie-break order)
    first_seen: Vec<PitchClass>,
    offsets: Vec<f64>,
}

impl PitchHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `pitch_class` and log its tuning offset
    pub fn record(&mut self, pitch_class: PitchClass, cents_offset: f64) {
        let slot = &mut self.counts[pitch_class.to_index()];
        if *slot == 0 {
            self.first_seen.push(pitch_class);
        }
        *slot += 1;
        self.offsets.push(cents_offset);
    }

    /// Occurrences of `pitch_class` so far
    pub fn count(&self, pitch_class: PitchClass) -> usize {
        self.counts[pitch_class.to_index()]
    }

    /// Total recorded samples
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Every recorded offset, in recording order
    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    /// Up to `n` pitch classes by descending count.
    ///
    /// Equal counts keep first-seen order, so identical input always yields
    /// identical output.
    pub fn top(&self, n: usize) -> Vec<PitchClass> {
        let mut ranked = self.first_seen.clone();
        // sort_by is stable: ties stay in first-seen order
        ranked.sort_by(|a, b| self.count(*b).cmp(&self.count(*a)));
        ranked.truncate(n);
        ranked
    }

    /// Mean cents offset over every recorded sample
    pub fn average_offset(&self) -> Result<f64> {
        if self.offsets.is_empty() {
            return Err(WavkeyError::EmptyHistogram);
        }
        Ok(self.offsets.iter().sum::<f64>() / self.offsets.len() as f64)
    }

    /// Population standard deviation of the cents offsets
    pub fn offset_std_dev(&self) -> Result<f64> {
        let mean = self.average_offset()?;
        let variance = self
            .offsets
            .iter()
            .map(|o| (o - mean).powi(2))
            .sum::<f64>()
            / self.offsets.len() as f64;
        Ok(variance.sqrt())
    }
}
