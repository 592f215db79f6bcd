//! Pitch to note quantization
//!
//! Maps a frequency onto the equal-tempered grid: the nearest semitone
//! (octave folded away) and the signed distance to it in cents.

use crate::error::{Result, WavkeyError};
use crate::types::{PitchClass, QuantizedPitch};

/// Concert pitch reference (A4) in Hz
pub const CONCERT_A_HZ: f64 = 440.0;

/// MIDI note number of A4
pub const CONCERT_A_MIDI: f64 = 69.0;

/// Snaps frequencies to semitones relative to a concert pitch reference
#[derive(Debug, Clone, Copy)]
pub struct NoteQuantizer {
    reference_hz: f64,
}

impl NoteQuantizer {
    /// Quantizer tuned to an arbitrary A4 reference
    pub fn new(reference_hz: f64) -> Result<Self> {
        if !(reference_hz.is_finite() && reference_hz > 0.0) {
            return Err(WavkeyError::Config(format!(
                "concert pitch must be a positive frequency, got {}",
                reference_hz
            )));
        }
        Ok(Self { reference_hz })
    }

    /// Fractional MIDI-equivalent note number for `pitch_hz`
    pub fn hz_to_midi(&self, pitch_hz: f64) -> Result<f64> {
        if !(pitch_hz.is_finite() && pitch_hz > 0.0) {
            return Err(WavkeyError::InvalidPitch { hz: pitch_hz });
        }
        // Difference of logs: the ratio underflows to zero for subnormal pitches
        let midi = CONCERT_A_MIDI + 12.0 * (pitch_hz.log2() - self.reference_hz.log2());
        if !midi.is_finite() {
            return Err(WavkeyError::InvalidPitch { hz: pitch_hz });
        }
        Ok(midi)
    }

    /// Nearest semitone and cents offset for `pitch_hz`
    pub fn quantize(&self, pitch_hz: f64) -> Result<QuantizedPitch> {
        let midi = self.hz_to_midi(pitch_hz)?;
        Ok(quantize_midi(midi))
    }
}

impl Default for NoteQuantizer {
    fn default() -> Self {
        Self {
            reference_hz: CONCERT_A_HZ,
        }
    }
}

/// Quantize a fractional MIDI note number.
///
/// Rounding is round-half-up: a value exactly halfway between two semitones
/// belongs to the upper one and reports an offset of -50 cents.
pub fn quantize_midi(midi: f64) -> QuantizedPitch {
    let nearest = (midi + 0.5).floor();
    QuantizedPitch {
        pitch_class: PitchClass::from_index(nearest as i64),
        cents_offset: (midi - nearest) * 100.0,
    }
}
