//! Core data types for wavkey
//!
//! These types represent the domain model and flow through the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// =============================================================================
// Musical primitives
// =============================================================================

/// The 12 pitch classes in Western music, spelled with sharps only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PitchClass {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

/// Chromatic scale starting at C
pub const CHROMATIC: [PitchClass; 12] = [
    PitchClass::C,
    PitchClass::Cs,
    PitchClass::D,
    PitchClass::Ds,
    PitchClass::E,
    PitchClass::F,
    PitchClass::Fs,
    PitchClass::G,
    PitchClass::Gs,
    PitchClass::A,
    PitchClass::As,
    PitchClass::B,
];

impl PitchClass {
    /// Convert from a semitone index; any integer is folded into 0..12 (floor-mod)
    pub fn from_index(index: i64) -> Self {
        CHROMATIC[index.rem_euclid(12) as usize]
    }

    /// Semitone index (0 = C, 1 = C#, ..., 11 = B)
    pub fn to_index(self) -> usize {
        self as usize
    }

    /// Standard notation ("C", "C#", ... "B")
    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }

    /// Pitch class `semitones` above this one
    pub fn transpose(self, semitones: i64) -> Self {
        Self::from_index(self.to_index() as i64 + semitones)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PitchClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CHROMATIC
            .iter()
            .copied()
            .find(|pc| pc.name() == s.trim())
            .ok_or_else(|| format!("unknown pitch class '{}' (expected one of C, C#, D, ... B)", s))
    }
}

/// Major or natural minor scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Major,
    Minor,
}

impl Mode {
    /// Semitone steps from the tonic for each scale degree
    pub fn intervals(self) -> [i64; 7] {
        match self {
            Mode::Major => [0, 2, 4, 5, 7, 9, 11],
            Mode::Minor => [0, 2, 3, 5, 7, 8, 10],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Major => "Major",
            Mode::Minor => "Minor",
        }
    }
}

// =============================================================================
// Analysis results
// =============================================================================

/// A detected pitch snapped to the nearest semitone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizedPitch {
    /// Octave-independent semitone
    pub pitch_class: PitchClass,
    /// Deviation from the exact semitone in cents, roughly [-50, 50]
    pub cents_offset: f64,
}

/// Best matching key signature for a set of candidate notes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMatchResult {
    /// Signature name, or "Unknown" when nothing matched
    pub key: String,
    /// Number of candidate notes found in the signature
    pub match_count: usize,
}

/// Outcome of one complete analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Estimated key name ("C Major", ... or "Unknown")
    pub key_name: String,
    /// How many of the top notes belong to the estimated key
    pub match_count: usize,
    /// Mean tuning offset over every voiced sample, in cents
    pub average_cents_offset: f64,
    /// Spread of the tuning offsets, in cents
    pub cents_std_dev: f64,
    /// Most frequent pitch classes, most frequent first
    pub top_notes: Vec<String>,
    /// Samples that carried a pitch and were recorded
    pub voiced_samples: usize,
    /// Every reading pulled from the source, voiced or not
    pub total_samples: usize,
}

/// Analysis outcome for a single input file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub path: PathBuf,
    /// Present when a key could be estimated
    pub report: Option<AnalysisReport>,
    /// Why no report was produced (no pitch data, decode failure, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// =============================================================================
// Supported formats
// =============================================================================

/// Audio formats supported by wavkey
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Flac,
    Mp3,
}

impl AudioFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "wav" | "wave" => Some(AudioFormat::Wav),
            "flac" => Some(AudioFormat::Flac),
            "mp3" => Some(AudioFormat::Mp3),
            _ => None,
        }
    }

    /// Check if a path has a supported extension
    pub fn is_supported_path(path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .is_some()
    }
}
