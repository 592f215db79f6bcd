//! Audio input
//!
//! Streaming decode of audio files into fixed-size analysis frames.

pub mod decoder;

pub use decoder::FrameReader;
