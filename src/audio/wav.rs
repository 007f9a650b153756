//! WAV encode/decode for recording artifacts.
//!
//! Finished recordings are always encoded as 16-bit PCM WAV. Decoding is
//! format-aware enough to also accept float WAV data, since exported files
//! may be fed back through the `play` command.

use std::io::Cursor;

use crate::error::{Result, VocapError};

/// Sample buffer and format metadata recovered from an artifact's bytes.
///
/// `precise_duration_secs` is the sample-accurate clip length
/// (`frames / sample_rate`) that replaces the artifact's wall-clock estimate.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub sample_rate: u32,
    pub channels: u16,
    /// Interleaved 16-bit PCM samples.
    pub samples: Vec<i16>,
    pub precise_duration_secs: f64,
}

impl DecodedAudio {
    /// Number of sample frames (samples per channel).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels as usize
    }
}

/// Decode a WAV byte buffer into samples and a precise duration.
///
/// # Errors
/// Returns `VocapError::Decode` if the buffer is not a valid WAV container
/// or uses a sample format other than 16-bit int or 32-bit float.
pub fn decode_wav_bytes(bytes: &[u8]) -> Result<DecodedAudio> {
    let mut reader =
        hound::WavReader::new(Cursor::new(bytes)).map_err(|e| VocapError::Decode {
            message: format!("Failed to parse WAV container: {}", e),
        })?;

    let spec = reader.spec();
    if spec.channels == 0 || spec.sample_rate == 0 {
        return Err(VocapError::Decode {
            message: format!(
                "Invalid WAV format: {} channels at {}Hz",
                spec.channels, spec.sample_rate
            ),
        });
    }

    let samples: Vec<i16> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| VocapError::Decode {
                message: format!("Failed to read WAV samples: {}", e),
            })?,
        (hound::SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| VocapError::Decode {
                message: format!("Failed to read WAV samples: {}", e),
            })?,
        (format, bits) => {
            return Err(VocapError::Decode {
                message: format!("Unsupported sample format: {:?}/{} bits", format, bits),
            });
        }
    };

    let frames = samples.len() / spec.channels as usize;
    let precise_duration_secs = frames as f64 / spec.sample_rate as f64;

    Ok(DecodedAudio {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        samples,
        precise_duration_secs,
    })
}

/// Encode interleaved 16-bit PCM samples into a WAV byte buffer.
pub fn encode_wav_bytes(samples: &[i16], sample_rate: u32, channels: u16) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer =
        hound::WavWriter::new(&mut cursor, spec).map_err(|e| VocapError::AudioCapture {
            message: format!("Failed to create WAV writer: {}", e),
        })?;
    for &sample in samples {
        writer
            .write_sample(sample)
            .map_err(|e| VocapError::AudioCapture {
                message: format!("Failed to encode WAV sample: {}", e),
            })?;
    }
    writer.finalize().map_err(|e| VocapError::AudioCapture {
        message: format!("Failed to finalize WAV blob: {}", e),
    })?;

    Ok(cursor.into_inner())
}

/// RMS level of a sample block, normalized to `[0, 1]`.
///
/// Drives the live input meter while recording.
pub fn rms_level(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples
        .iter()
        .map(|&s| {
            let v = s as f64 / i16::MAX as f64;
            v * v
        })
        .sum();
    (sum / samples.len() as f64).sqrt() as f32
}
