//! Default configuration constants for vocap.
//!
//! Shared constants used across configuration types and components to keep
//! the capture, decode, and rendering paths consistent.

/// Default audio sample rate in Hz.
///
/// 16kHz mono is the standard for voice recordings and keeps artifact blobs
/// small without hurting intelligibility.
pub const SAMPLE_RATE: u32 = 16000;

/// Number of channels recorded and encoded into artifacts.
pub const CHANNELS: u16 = 1;

/// MIME type every finished artifact is tagged with.
///
/// Recordings are always finalized as WAV regardless of the capture backend,
/// so downstream consumers never have to sniff the container.
pub const ARTIFACT_MIME: &str = "audio/wav";

/// File extension matching [`ARTIFACT_MIME`], used by export.
pub const ARTIFACT_EXTENSION: &str = "wav";

/// Default filename for exported recordings.
pub const DOWNLOAD_FILENAME: &str = "recording.wav";

/// Number of min/max peak buckets a waveform view is built with.
///
/// 64 bars fills a typical terminal row while still tracking the envelope of
/// short voice clips.
pub const WAVEFORM_BARS: usize = 64;

/// Width of the live input level meter in characters.
pub const METER_WIDTH: usize = 20;

/// RMS level that maps to a full level meter.
///
/// 0.1 RMS is loud speech on a typical microphone; anything above it renders
/// as a saturated bar.
pub const METER_FULL_SCALE: f32 = 0.1;

/// Divergence between the wall-clock estimate and the decoded duration above
/// which a correction warning is logged, in seconds.
pub const DURATION_DRIFT_WARN_SECS: f64 = 1.0;
