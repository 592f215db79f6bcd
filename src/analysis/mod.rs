//! Audio analysis modules
//!
//! The key estimation core (quantizer, histogram, key matching) works on
//! plain pitch readings; the pitch tracker behind [`FramePitchEstimator`]
//! produces those readings from audio frames.

pub mod histogram;
pub mod key;
pub mod pitch;
pub mod quantizer;
pub mod traits;

pub use histogram::PitchHistogram;
pub use key::{match_key, KeySignature, KeySignatureTable, UNKNOWN_KEY};
pub use pitch::{DetectorConfig, McLeodEstimator, PitchTrack};
pub use quantizer::NoteQuantizer;
pub use traits::FramePitchEstimator;
