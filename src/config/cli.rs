//! CLI argument parsing and configuration

use crate::analysis::pitch::DEFAULT_POWER_THRESHOLD;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// wavkey - Estimate the musical key of recordings
///
/// Tracks the pitch of each audio file frame by frame, builds a histogram of
/// the notes heard and matches the most frequent notes against known key
/// signatures. Also reports the average tuning offset in cents.
#[derive(Parser, Debug)]
#[command(name = "wavkey")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Audio files or directories to analyze (WAV, FLAC, MP3)
    #[arg(value_name = "PATH", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Scan directories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Number of worker threads (defaults to CPU count - 1)
    #[arg(short = 'j', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Samples per pitch analysis frame (frames do not overlap)
    #[arg(long, value_name = "SAMPLES", default_value_t = 1024)]
    pub frame_size: usize,

    /// Minimum mean square per sample for pitch detection (1e-4 is -40 dBFS RMS)
    #[arg(long, value_name = "POWER", default_value_t = DEFAULT_POWER_THRESHOLD)]
    pub power_threshold: f64,

    /// Minimum pitch clarity (0.0 - 1.0)
    #[arg(long, value_name = "CLARITY", default_value_t = 0.7)]
    pub clarity_threshold: f64,

    /// Reference frequency of A4 in Hz
    #[arg(long, value_name = "HZ", default_value_t = 440.0)]
    pub concert_pitch: f64,

    /// How many of the most frequent notes to match against keys
    #[arg(long, value_name = "N", default_value_t = 3)]
    pub top: usize,

    /// Built-in key table to match against
    #[arg(long, value_enum, default_value_t = KeySet::Builtin)]
    pub key_set: KeySet,

    /// JSON file with a custom key table (overrides --key-set)
    #[arg(long, value_name = "FILE", conflicts_with = "key_set")]
    pub keys: Option<PathBuf>,

    /// Write all reports to this JSON file
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Built-in key signature tables
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySet {
    /// C Major, A Minor, G Major, E Minor
    Builtin,
    /// All 24 major and natural minor keys
    All,
}

impl Cli {
    /// Default tracing filter based on verbosity flags
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["wavkey", "take.wav"]);
        assert_eq!(cli.inputs, vec![PathBuf::from("take.wav")]);
        assert_eq!(cli.frame_size, 1024);
        assert_eq!(cli.top, 3);
        assert_eq!(cli.power_threshold, DEFAULT_POWER_THRESHOLD);
        assert_eq!(cli.key_set, KeySet::Builtin);
        assert!(cli.keys.is_none());
        assert_eq!(cli.log_filter(), "warn");
    }

    #[test]
    fn test_requires_input() {
        assert!(Cli::try_parse_from(["wavkey"]).is_err());
    }

    #[test]
    fn test_verbosity() {
        let cli = Cli::parse_from(["wavkey", "-vv", "a.wav"]);
        assert_eq!(cli.log_filter(), "debug");
        let cli = Cli::parse_from(["wavkey", "-vv", "-q", "a.wav"]);
        assert_eq!(cli.log_filter(), "error");
    }

    #[test]
    fn test_key_options() {
        let cli = Cli::parse_from(["wavkey", "--key-set", "all", "a.wav"]);
        assert_eq!(cli.key_set, KeySet::All);

        let cli = Cli::parse_from(["wavkey", "--keys", "keys.json", "a.wav"]);
        assert_eq!(cli.keys, Some(PathBuf::from("keys.json")));

        assert!(
            Cli::try_parse_from(["wavkey", "--key-set", "all", "--keys", "k.json", "a.wav"])
                .is_err()
        );
    }
}
