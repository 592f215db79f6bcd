//! Runtime configuration settings

use super::cli::{Cli, KeySet};
use crate::analysis::{DetectorConfig, KeySignatureTable};
use crate::error::{Result, WavkeyError};
use crate::pipeline::DEFAULT_TOP_NOTES;
use std::path::PathBuf;

/// Smallest frame the pitch detector is given
pub const MIN_FRAME_SIZE: usize = 64;

/// Where key signatures come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyTableSource {
    /// The four default keys
    Builtin,
    /// All 24 major and natural minor keys
    CircleOfFifths,
    /// User supplied JSON table
    File(PathBuf),
}

/// Runtime settings for the analysis pipeline
#[derive(Debug, Clone)]
pub struct Settings {
    /// Input paths (files or directories)
    pub inputs: Vec<PathBuf>,
    /// Scan directories recursively
    pub recursive: bool,
    /// Number of analysis worker threads
    pub analysis_threads: usize,
    /// Pitch detector parameters
    pub detector: DetectorConfig,
    /// A4 reference frequency in Hz
    pub concert_pitch_hz: f64,
    /// Number of most frequent notes matched against keys
    pub top_n: usize,
    /// Key signature table
    pub key_table: KeyTableSource,
    /// Optional JSON report path
    pub json_output: Option<PathBuf>,
}

impl Settings {
    /// Create settings from CLI arguments
    pub fn from_cli(cli: &Cli) -> Self {
        let key_table = match (&cli.keys, cli.key_set) {
            (Some(path), _) => KeyTableSource::File(path.clone()),
            (None, KeySet::Builtin) => KeyTableSource::Builtin,
            (None, KeySet::All) => KeyTableSource::CircleOfFifths,
        };

        Self {
            inputs: cli.inputs.clone(),
            recursive: cli.recursive,
            analysis_threads: cli.threads.unwrap_or_else(default_threads),
            detector: DetectorConfig {
                frame_size: cli.frame_size,
                power_threshold: cli.power_threshold,
                clarity_threshold: cli.clarity_threshold,
            },
            concert_pitch_hz: cli.concert_pitch,
            top_n: cli.top,
            key_table,
            json_output: cli.json.clone(),
        }
    }

    /// Check values clap cannot check on its own
    pub fn validate(&self) -> Result<()> {
        if self.detector.frame_size < MIN_FRAME_SIZE {
            return Err(WavkeyError::Config(format!(
                "frame size must be at least {} samples, got {}",
                MIN_FRAME_SIZE, self.detector.frame_size
            )));
        }
        if !(self.concert_pitch_hz.is_finite() && self.concert_pitch_hz > 0.0) {
            return Err(WavkeyError::Config(format!(
                "concert pitch must be a positive frequency, got {}",
                self.concert_pitch_hz
            )));
        }
        if !(self.detector.power_threshold.is_finite() && self.detector.power_threshold >= 0.0) {
            return Err(WavkeyError::Config(format!(
                "power threshold must be a non-negative mean square, got {}",
                self.detector.power_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.detector.clarity_threshold) {
            return Err(WavkeyError::Config(format!(
                "clarity threshold must be between 0 and 1, got {}",
                self.detector.clarity_threshold
            )));
        }
        if self.top_n == 0 {
            return Err(WavkeyError::Config("top note count must be at least 1".to_string()));
        }
        if self.analysis_threads == 0 {
            return Err(WavkeyError::Config("thread count must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Build the key signature table these settings select
    pub fn load_key_table(&self) -> Result<KeySignatureTable> {
        match &self.key_table {
            KeyTableSource::Builtin => Ok(KeySignatureTable::builtin()),
            KeyTableSource::CircleOfFifths => Ok(KeySignatureTable::circle_of_fifths()),
            KeyTableSource::File(path) => KeySignatureTable::from_json_file(path),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            inputs: vec![PathBuf::from(".")],
            recursive: false,
            analysis_threads: default_threads(),
            detector: DetectorConfig::default(),
            concert_pitch_hz: crate::analysis::quantizer::CONCERT_A_HZ,
            top_n: DEFAULT_TOP_NOTES,
            key_table: KeyTableSource::Builtin,
            json_output: None,
        }
    }
}

fn default_threads() -> usize {
    num_cpus::get().saturating_sub(1).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_from_cli() {
        let cli = Cli::parse_from([
            "wavkey",
            "-j",
            "2",
            "--frame-size",
            "2048",
            "--key-set",
            "all",
            "--json",
            "out.json",
            "a.wav",
            "b.wav",
        ]);
        let settings = Settings::from_cli(&cli);
        assert_eq!(settings.inputs.len(), 2);
        assert_eq!(settings.analysis_threads, 2);
        assert_eq!(settings.detector.frame_size, 2048);
        assert_eq!(settings.key_table, KeyTableSource::CircleOfFifths);
        assert_eq!(settings.json_output, Some(PathBuf::from("out.json")));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_custom_key_file_wins() {
        let cli = Cli::parse_from(["wavkey", "--keys", "mine.json", "a.wav"]);
        let settings = Settings::from_cli(&cli);
        assert_eq!(settings.key_table, KeyTableSource::File(PathBuf::from("mine.json")));
    }

    #[test]
    fn test_default_is_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.load_key_table().unwrap().len(), 4);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.detector.frame_size = 16;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.concert_pitch_hz = -440.0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.top_n = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.detector.clarity_threshold = 1.5;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.detector.power_threshold = -1e-4;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_missing_key_file_is_config_error() {
        let settings = Settings {
            key_table: KeyTableSource::File(PathBuf::from("/no/such/keys.json")),
            ..Settings::default()
        };
        assert!(matches!(settings.load_key_table(), Err(WavkeyError::Config(_))));
    }
}
