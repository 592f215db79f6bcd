//! Single-clip analysis orchestration
//!
//! Pulls pitch readings one at a time, folds them into a fresh histogram
//! and turns the finished histogram into an [`AnalysisReport`].

use crate::analysis::{match_key, KeySignatureTable, NoteQuantizer, PitchHistogram};
use crate::error::{Result, WavkeyError};
use crate::types::AnalysisReport;
use tracing::debug;

/// Number of most frequent pitch classes matched against key signatures
pub const DEFAULT_TOP_NOTES: usize = 3;

/// Drives one key analysis per call to [`AnalysisOrchestrator::analyze`]
///
/// Holds only immutable configuration, so one orchestrator can serve many
/// concurrent runs; each run owns its own histogram.
#[derive(Debug, Clone)]
pub struct AnalysisOrchestrator {
    quantizer: NoteQuantizer,
    signatures: KeySignatureTable,
    top_n: usize,
}

impl AnalysisOrchestrator {
    pub fn new(quantizer: NoteQuantizer, signatures: KeySignatureTable, top_n: usize) -> Self {
        Self {
            quantizer,
            signatures,
            top_n,
        }
    }

    pub fn signatures(&self) -> &KeySignatureTable {
        &self.signatures
    }

    /// Estimate the key of a stream of pitch readings in Hz.
    ///
    /// Readings that are zero, negative or not finite mean "no pitch" and are
    /// skipped. The stream is consumed exactly once. A stream without a
    /// single usable reading yields [`WavkeyError::NoPitchData`].
    pub fn analyze<I>(&self, samples: I) -> Result<AnalysisReport>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut histogram = PitchHistogram::new();
        let mut total_samples = 0usize;

        for pitch_hz in samples {
            total_samples += 1;
            if !(pitch_hz.is_finite() && pitch_hz > 0.0) {
                continue;
            }
            let note = self.quantizer.quantize(pitch_hz)?;
            histogram.record(note.pitch_class, note.cents_offset);
        }

        if histogram.is_empty() {
            debug!("No voiced samples among {} readings", total_samples);
            return Err(WavkeyError::NoPitchData);
        }

        let top = histogram.top(self.top_n);
        let matched = match_key(&top, &self.signatures);

        let average_cents_offset = histogram.average_offset().map_err(no_pitch_data)?;
        let cents_std_dev = histogram.offset_std_dev().map_err(no_pitch_data)?;

        debug!(
            "Top notes {:?} -> {} ({} matches), avg offset {:.2} cents over {} samples",
            top,
            matched.key,
            matched.match_count,
            average_cents_offset,
            histogram.len()
        );

        Ok(AnalysisReport {
            key_name: matched.key,
            match_count: matched.match_count,
            average_cents_offset,
            cents_std_dev,
            top_notes: top.iter().map(|pc| pc.name().to_string()).collect(),
            voiced_samples: histogram.len(),
            total_samples,
        })
    }
}

impl Default for AnalysisOrchestrator {
    fn default() -> Self {
        Self::new(
            NoteQuantizer::default(),
            KeySignatureTable::builtin(),
            DEFAULT_TOP_NOTES,
        )
    }
}

fn no_pitch_data(err: WavkeyError) -> WavkeyError {
    match err {
        WavkeyError::EmptyHistogram => WavkeyError::NoPitchData,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::key::UNKNOWN_KEY;

    const C4: f64 = 261.63;
    const E4: f64 = 329.63;
    const G4: f64 = 392.00;

    #[test]
    fn test_c_major_triad() {
        let samples = [C4, E4, G4].repeat(10);
        let report = AnalysisOrchestrator::default().analyze(samples).unwrap();

        assert_eq!(report.key_name, "C Major");
        assert_eq!(report.match_count, 3);
        assert!(report.average_cents_offset.abs() < 1.0);
        assert_eq!(report.top_notes, vec!["C", "E", "G"]);
        assert_eq!(report.voiced_samples, 30);
        assert_eq!(report.total_samples, 30);
    }

    #[test]
    fn test_empty_stream_is_no_pitch_data() {
        let result = AnalysisOrchestrator::default().analyze(std::iter::empty());
        assert!(matches!(result, Err(WavkeyError::NoPitchData)));
    }

    #[test]
    fn test_unvoiced_readings_are_skipped() {
        let samples = vec![0.0, -1.0, f64::NAN, 440.0, 0.0, f64::INFINITY];
        let report = AnalysisOrchestrator::default().analyze(samples).unwrap();
        assert_eq!(report.voiced_samples, 1);
        assert_eq!(report.total_samples, 6);
        assert_eq!(report.top_notes, vec!["A"]);
        assert_eq!(report.key_name, "C Major");
        assert_eq!(report.match_count, 1);
    }

    #[test]
    fn test_only_unvoiced_is_no_pitch_data() {
        let result = AnalysisOrchestrator::default().analyze(vec![0.0; 100]);
        assert!(matches!(result, Err(WavkeyError::NoPitchData)));
    }

    #[test]
    fn test_subnormal_reading_keeps_statistics_finite() {
        let report = AnalysisOrchestrator::default().analyze([5e-324]).unwrap();
        assert_eq!(report.voiced_samples, 1);
        assert!(report.average_cents_offset.is_finite());
        assert!(report.cents_std_dev.is_finite());
    }

    #[test]
    fn test_out_of_table_notes_are_unknown() {
        // C#, D#, G# appear in none of the built-in keys
        let samples = [277.18, 311.13, 415.30].repeat(4);
        let report = AnalysisOrchestrator::default().analyze(samples).unwrap();
        assert_eq!(report.key_name, UNKNOWN_KEY);
        assert_eq!(report.match_count, 0);
    }

    #[test]
    fn test_average_covers_every_sample() {
        let cents = |c: f64| 440.0 * 2f64.powf(c / 1200.0);
        // Three A's at +10 cents, one E at -30 cents; E is not in the top 1
        let samples = vec![cents(10.0), cents(10.0), cents(10.0), 329.6276 * 2f64.powf(-30.0 / 1200.0)];
        let orchestrator =
            AnalysisOrchestrator::new(NoteQuantizer::default(), KeySignatureTable::builtin(), 1);
        let report = orchestrator.analyze(samples).unwrap();
        assert_eq!(report.top_notes, vec!["A"]);
        assert!((report.average_cents_offset - 0.0).abs() < 0.01);
        assert!(report.cents_std_dev > 10.0);
    }

    #[test]
    fn test_runs_are_independent() {
        let orchestrator = AnalysisOrchestrator::default();
        let first = orchestrator.analyze([C4, E4, G4].repeat(5)).unwrap();
        let second = orchestrator.analyze(vec![G4, 369.99, 293.66, 369.99]).unwrap();
        assert_eq!(first.voiced_samples, 15);
        assert_eq!(second.voiced_samples, 4);
        assert_eq!(second.key_name, "G Major");
    }
}
