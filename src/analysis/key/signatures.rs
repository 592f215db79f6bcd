//! Key signature reference tables
//!
//! A table is an ordered list: when two signatures score the same, the one
//! listed first wins. Names use sharps only (no enharmonic flats).

use crate::error::{Result, WavkeyError};
use crate::types::{Mode, PitchClass};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// A named set of seven pitch classes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySignature {
    name: String,
    notes: [PitchClass; 7],
}

impl KeySignature {
    /// Build a signature, rejecting repeated pitch classes
    pub fn new(name: impl Into<String>, notes: [PitchClass; 7]) -> Result<Self> {
        let name = name.into();
        let distinct: HashSet<_> = notes.iter().collect();
        if distinct.len() != notes.len() {
            return Err(WavkeyError::Config(format!(
                "key signature '{}' repeats a pitch class",
                name
            )));
        }
        Ok(Self { name, notes })
    }

    /// Major or natural minor scale on `tonic`, e.g. "G Major"
    pub fn diatonic(tonic: PitchClass, mode: Mode) -> Self {
        let intervals = mode.intervals();
        let notes = intervals.map(|step| tonic.transpose(step));
        Self {
            name: format!("{} {}", tonic.name(), mode.name()),
            notes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn notes(&self) -> &[PitchClass; 7] {
        &self.notes
    }

    pub fn contains(&self, pitch_class: PitchClass) -> bool {
        self.notes.contains(&pitch_class)
    }
}

/// Ordered collection of key signatures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySignatureTable {
    signatures: Vec<KeySignature>,
}

/// On-disk form of a user supplied signature
#[derive(Debug, Deserialize)]
struct SignatureJson {
    name: String,
    notes: Vec<String>,
}

impl KeySignatureTable {
    pub fn new(signatures: Vec<KeySignature>) -> Self {
        Self { signatures }
    }

    /// The four built-in keys: C Major, A Minor, G Major, E Minor
    pub fn builtin() -> Self {
        Self::new(vec![
            KeySignature::diatonic(PitchClass::C, Mode::Major),
            KeySignature::diatonic(PitchClass::A, Mode::Minor),
            KeySignature::diatonic(PitchClass::G, Mode::Major),
            KeySignature::diatonic(PitchClass::E, Mode::Minor),
        ])
    }

    /// All 24 major and natural minor keys.
    ///
    /// Walks the circle of fifths from C, each major key followed by its
    /// relative minor, so the first four entries are the built-in table.
    pub fn circle_of_fifths() -> Self {
        let signatures = (0..12)
            .flat_map(|step| {
                let tonic = PitchClass::C.transpose(7 * step);
                [
                    KeySignature::diatonic(tonic, Mode::Major),
                    KeySignature::diatonic(tonic.transpose(-3), Mode::Minor),
                ]
            })
            .collect();
        Self::new(signatures)
    }

    /// Load a table from a JSON array of `{ "name": ..., "notes": [...] }`
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            WavkeyError::Config(format!("cannot open key table {}: {}", path.display(), e))
        })?;
        let entries: Vec<SignatureJson> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| {
                WavkeyError::Config(format!("cannot parse key table {}: {}", path.display(), e))
            })?;

        let table = Self::from_entries(entries)?;
        debug!("Loaded {} key signatures from {}", table.len(), path.display());
        Ok(table)
    }

    /// Parse a table from a JSON string (same schema as [`Self::from_json_file`])
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: Vec<SignatureJson> = serde_json::from_str(json)
            .map_err(|e| WavkeyError::Config(format!("cannot parse key table: {}", e)))?;
        Self::from_entries(entries)
    }

    fn from_entries(entries: Vec<SignatureJson>) -> Result<Self> {
        if entries.is_empty() {
            return Err(WavkeyError::Config("key table is empty".to_string()));
        }

        let mut signatures = Vec::with_capacity(entries.len());
        for entry in entries {
            let notes = entry
                .notes
                .iter()
                .map(|n| n.parse::<PitchClass>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| WavkeyError::Config(format!("key '{}': {}", entry.name, e)))?;
            let notes: [PitchClass; 7] = notes.try_into().map_err(|v: Vec<PitchClass>| {
                WavkeyError::Config(format!(
                    "key '{}' must list exactly 7 notes, found {}",
                    entry.name,
                    v.len()
                ))
            })?;
            signatures.push(KeySignature::new(entry.name, notes)?);
        }
        Ok(Self::new(signatures))
    }

    /// Append a signature; it loses ties against every earlier entry
    pub fn push(&mut self, signature: KeySignature) {
        self.signatures.push(signature);
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeySignature> {
        self.signatures.iter()
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

impl Default for KeySignatureTable {
    fn default() -> Self {
        Self::builtin()
    }
}
