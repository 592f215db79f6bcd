//! Streaming audio decoding using symphonia
//!
//! Decodes packets on demand and hands out fixed-size mono frames, so a
//! file of any length is analyzed with only one frame (plus one decoded
//! packet) in memory.

use crate::error::{Result, WavkeyError};
use std::path::{Path, PathBuf};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, trace};

/// Non-overlapping mono frames read from an audio file
pub struct FrameReader {
    path: PathBuf,
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    sample_rate: u32,
    frame_size: usize,
    /// Decoded mono samples not yet handed out
    pending: Vec<f32>,
    finished: bool,
}

impl FrameReader {
    /// Open `path` and prepare to read frames of `frame_size` samples
    pub fn open(path: &Path, frame_size: usize) -> Result<Self> {
        if frame_size == 0 {
            return Err(WavkeyError::Config("frame size must be positive".to_string()));
        }

        let file = std::fs::File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                WavkeyError::FileNotFound(path.to_path_buf())
            } else {
                WavkeyError::decode(path, format!("Failed to open file: {}", e))
            }
        })?;

        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // Provide a hint based on file extension
        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| WavkeyError::decode(path, format!("Failed to probe format: {}", e)))?;

        let format = probed.format;

        // Find the first audio track
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| WavkeyError::decode(path, "No audio tracks found"))?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| WavkeyError::decode(path, "Unknown sample rate"))?;

        debug!(
            "Decoding: {} @ {}Hz, {} channels",
            path.display(),
            sample_rate,
            codec_params.channels.map(|c| c.count()).unwrap_or(0)
        );

        let decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| WavkeyError::decode(path, format!("Failed to create decoder: {}", e)))?;

        Ok(Self {
            path: path.to_path_buf(),
            format,
            decoder,
            track_id,
            sample_rate,
            frame_size,
            pending: Vec::with_capacity(frame_size * 2),
            finished: false,
        })
    }

    /// Native sample rate of the decoded track
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Decode the next packet of our track into mono samples; `None` at end of stream
    fn decode_next_packet(&mut self) -> Result<Option<Vec<f32>>> {
        loop {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    return Ok(None);
                }
                Err(SymphoniaError::ResetRequired) => return Ok(None),
                Err(e) => {
                    return Err(WavkeyError::decode(
                        &self.path,
                        format!("Failed to read packet: {}", e),
                    ));
                }
            };

            // Skip packets from other tracks
            if packet.track_id() != self.track_id {
                continue;
            }

            match self.decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    let channels = spec.channels.count();
                    let mut sample_buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                    sample_buf.copy_interleaved_ref(decoded);
                    return Ok(Some(to_mono(sample_buf.samples(), channels)));
                }
                Err(SymphoniaError::DecodeError(e)) => {
                    // Skip corrupted frames
                    trace!("Skipping corrupted frame: {}", e);
                }
                Err(e) => {
                    return Err(WavkeyError::decode(&self.path, format!("Decode error: {}", e)));
                }
            }
        }
    }
}

impl Iterator for FrameReader {
    type Item = Result<Vec<f32>>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished && self.pending.len() < self.frame_size {
            match self.decode_next_packet() {
                Ok(Some(samples)) => self.pending.extend(samples),
                Ok(None) => self.finished = true,
                Err(e) => {
                    self.finished = true;
                    self.pending.clear();
                    return Some(Err(e));
                }
            }
        }

        if self.pending.len() >= self.frame_size {
            let rest = self.pending.split_off(self.frame_size);
            return Some(Ok(std::mem::replace(&mut self.pending, rest)));
        }

        // Last partial frame, zero padded
        if !self.pending.is_empty() {
            let mut frame = std::mem::take(&mut self.pending);
            frame.resize(self.frame_size, 0.0);
            return Some(Ok(frame));
        }

        None
    }
}

/// Convert interleaved multi-channel audio to mono
fn to_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_mono_averages_channels() {
        let stereo = [1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        assert_eq!(to_mono(&stereo, 2), vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_to_mono_passthrough() {
        let mono = [0.1, 0.2, 0.3];
        assert_eq!(to_mono(&mono, 1), mono.to_vec());
    }

    #[test]
    fn test_open_missing_file() {
        let result = FrameReader::open(Path::new("/definitely/not/here.wav"), 1024);
        assert!(matches!(result, Err(WavkeyError::FileNotFound(_))));
    }

    #[test]
    fn test_open_rejects_zero_frame_size() {
        let result = FrameReader::open(Path::new("whatever.wav"), 0);
        assert!(matches!(result, Err(WavkeyError::Config(_))));
    }
}
